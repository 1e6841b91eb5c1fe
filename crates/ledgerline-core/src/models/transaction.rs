//! Statement transaction models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Calendar month as printed on statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

const MONTHS: [Month; 12] = [
    Month::Jan,
    Month::Feb,
    Month::Mar,
    Month::Apr,
    Month::May,
    Month::Jun,
    Month::Jul,
    Month::Aug,
    Month::Sep,
    Month::Oct,
    Month::Nov,
    Month::Dec,
];

impl Month {
    /// Parse a month name or its three-letter abbreviation, ignoring case.
    ///
    /// Accepts "Dec", "DEC", "December"; rejects "De" and "Decem".
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let prefix = lower.get(..3)?;
        let month = MONTHS
            .iter()
            .copied()
            .find(|m| m.abbrev().eq_ignore_ascii_case(prefix))?;

        if lower.len() == 3 || lower == month.full_name().to_ascii_lowercase() {
            Some(month)
        } else {
            None
        }
    }

    /// Month number, 1 - 12.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Month::Jan => "January",
            Month::Feb => "February",
            Month::Mar => "March",
            Month::Apr => "April",
            Month::May => "May",
            Month::Jun => "June",
            Month::Jul => "July",
            Month::Aug => "August",
            Month::Sep => "September",
            Month::Oct => "October",
            Month::Nov => "November",
            Month::Dec => "December",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// The statement period that bare `MON DD` dates are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementContext {
    pub month: Month,
    pub year: i32,
}

impl StatementContext {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// Year of a date printed as `month` on this statement.
    ///
    /// January and February dates on a December statement belong to the next
    /// year; November and December dates on a January statement to the
    /// previous one.
    pub fn resolve_year(&self, month: Month) -> i32 {
        match (self.month, month) {
            (Month::Dec, Month::Jan | Month::Feb) => self.year + 1,
            (Month::Jan, Month::Nov | Month::Dec) => self.year - 1,
            _ => self.year,
        }
    }
}

impl std::fmt::Display for StatementContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// One ledger entry parsed from a statement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date the purchase or credit happened.
    pub transaction_date: NaiveDate,
    /// Date the issuer posted it.
    pub posting_date: NaiveDate,
    /// Merchant / description text as printed.
    pub description: String,
    /// Signed amount; negative when the statement prints a leading minus.
    pub amount: Decimal,
}

impl Transaction {
    /// Semicolon-delimited record: `Mon DD YYYY;Mon DD YYYY;description;amount`.
    pub fn to_record(&self) -> String {
        format!(
            "{};{};{};{}",
            self.transaction_date.format("%b %d %Y"),
            self.posting_date.format("%b %d %Y"),
            self.description,
            self.amount
        )
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_record())
    }
}
