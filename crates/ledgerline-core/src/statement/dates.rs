//! `MON DD` statement dates.

use chrono::NaiveDate;

use super::patterns::MONTH_DAY;
use crate::error::ParseSkip;
use crate::models::transaction::{Month, StatementContext};

/// Split a `MON DD` token into its month and day.
pub fn parse_month_day(token: &str) -> Option<(Month, u32)> {
    let caps = MONTH_DAY.captures(token.trim())?;
    let month = Month::parse(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    Some((month, day))
}

/// Resolve a row's transaction and posting tokens to full dates.
///
/// The year comes from the transaction month alone and is shared by both
/// dates, so a posting date that crosses the year boundary keeps the
/// transaction's year.
pub fn resolve_row_dates(
    transaction: &str,
    posting: &str,
    context: &StatementContext,
) -> Result<(NaiveDate, NaiveDate), ParseSkip> {
    let invalid = |text: &str| ParseSkip::InvalidDate {
        text: text.to_string(),
    };

    let (transaction_month, transaction_day) =
        parse_month_day(transaction).ok_or_else(|| invalid(transaction))?;
    let (posting_month, posting_day) = parse_month_day(posting).ok_or_else(|| invalid(posting))?;

    let year = context.resolve_year(transaction_month);
    let transaction_date =
        NaiveDate::from_ymd_opt(year, transaction_month.number(), transaction_day)
            .ok_or_else(|| invalid(transaction))?;
    let posting_date = NaiveDate::from_ymd_opt(year, posting_month.number(), posting_day)
        .ok_or_else(|| invalid(posting))?;

    Ok((transaction_date, posting_date))
}
