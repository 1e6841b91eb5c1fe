//! Dollar amounts as printed on statements (`-$1,234.56`).

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a printed amount. The currency symbol and thousands separators are
/// dropped; a leading minus makes the value negative.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let cleaned: String = rest
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

/// Format an amount the way statements print it: `-$1,234.56`.
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, formatted, decimal_part)
}
