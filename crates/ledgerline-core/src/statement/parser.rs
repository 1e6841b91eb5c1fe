//! Transaction row parsing and statement stream reading.

use tracing::{debug, trace, warn};

use super::amounts::parse_amount;
use super::dates::resolve_row_dates;
use super::ledger::Ledger;
use super::patterns::TRANSACTION_ROW;
use crate::error::ParseSkip;
use crate::models::transaction::{StatementContext, Transaction};
use crate::stream::StreamLine;

/// Parse one row string into a transaction, resolving years against `context`.
pub fn parse_row(line: &str, context: &StatementContext) -> Result<Transaction, ParseSkip> {
    let caps = TRANSACTION_ROW
        .captures(line)
        .ok_or(ParseSkip::PatternMismatch)?;

    let (transaction_date, posting_date) = resolve_row_dates(&caps[1], &caps[2], context)?;
    let amount = parse_amount(&caps[4]).ok_or_else(|| ParseSkip::InvalidAmount {
        text: caps[4].to_string(),
    })?;

    Ok(Transaction {
        transaction_date,
        posting_date,
        description: caps[3].to_string(),
        amount,
    })
}

/// What the reader did with one stream line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// A header replaced the statement context.
    Context(StatementContext),
    /// A header with an unknown month ended the statement context.
    ContextCleared,
    /// A row produced a transaction.
    Transaction(Transaction),
    /// A row was dropped.
    Skipped(ParseSkip),
    /// Blank or unrecognised header line.
    Ignored,
}

/// Reads the intermediate text stream line by line, threading the statement
/// context from header lines into the rows that follow.
#[derive(Debug, Clone, Default)]
pub struct StatementReader {
    context: Option<StatementContext>,
    ledger: Ledger,
    skipped: usize,
}

impl StatementReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&StatementContext> {
        self.context.as_ref()
    }

    /// Number of rows dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Consume one line of the stream.
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        match StreamLine::parse(line) {
            None => LineOutcome::Ignored,
            Some(StreamLine::Header(context)) => {
                debug!("Statement context: {}", context);
                self.context = Some(context);
                LineOutcome::Context(context)
            }
            Some(StreamLine::UnknownPeriod(header)) => {
                warn!(
                    "Unknown statement month in {:?}, skipping rows until the next header",
                    header
                );
                self.context = None;
                LineOutcome::ContextCleared
            }
            Some(StreamLine::Row(row)) => {
                let result = match self.context.as_ref() {
                    Some(context) => parse_row(&row, context),
                    None => Err(ParseSkip::MissingStatementContext),
                };
                match result {
                    Ok(transaction) => {
                        trace!("Parsed: {}", transaction);
                        self.ledger.push(transaction.clone());
                        LineOutcome::Transaction(transaction)
                    }
                    Err(skip) => {
                        trace!("Skipped row {:?}: {}", row, skip);
                        self.skipped += 1;
                        LineOutcome::Skipped(skip)
                    }
                }
            }
        }
    }

    /// Consume every line of `text`.
    pub fn feed_text(&mut self, text: &str) {
        for line in text.lines() {
            self.feed(line);
        }
    }

    /// The accumulated ledger.
    pub fn finish(self) -> Ledger {
        debug!(
            "Read {} transactions, skipped {} rows",
            self.ledger.len(),
            self.skipped
        );
        self.ledger
    }
}

/// Parse a complete intermediate stream into a ledger.
pub fn read_stream(text: &str) -> Ledger {
    let mut reader = StatementReader::new();
    reader.feed_text(text);
    reader.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::Month;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_row() {
        let ctx = StatementContext::new(Month::Dec, 2023);
        let txn = parse_row("DEC 05 DEC 07 COFFEE SHOP -$1,234.56", &ctx).unwrap();

        assert_eq!(txn.transaction_date, date(2023, 12, 5));
        assert_eq!(txn.posting_date, date(2023, 12, 7));
        assert_eq!(txn.description, "COFFEE SHOP");
        assert_eq!(txn.amount, Decimal::from_str("-1234.56").unwrap());
    }

    #[test]
    fn test_parse_row_amount_without_separators() {
        let ctx = StatementContext::new(Month::Dec, 2023);
        let txn = parse_row("DEC 05 DEC 07 AIRLINE $1234.56", &ctx).unwrap();
        assert_eq!(txn.description, "AIRLINE");
        assert_eq!(txn.amount, Decimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn test_posting_date_takes_transaction_year() {
        let ctx = StatementContext::new(Month::Dec, 2023);
        let txn = parse_row("DEC 31 JAN 02 HOTEL $210.00", &ctx).unwrap();
        assert_eq!(txn.transaction_date, date(2023, 12, 31));
        assert_eq!(txn.posting_date, date(2023, 1, 2));

        let txn = parse_row("JAN 02 JAN 03 BOOKSTORE $12.00", &ctx).unwrap();
        assert_eq!(txn.transaction_date, date(2024, 1, 2));
        assert_eq!(txn.posting_date, date(2024, 1, 3));

        let ctx = StatementContext::new(Month::Jan, 2024);
        let txn = parse_row("DEC 30 JAN 02 HOTEL $210.00", &ctx).unwrap();
        assert_eq!(txn.transaction_date, date(2023, 12, 30));
        assert_eq!(txn.posting_date, date(2023, 1, 2));
    }

    #[test]
    fn test_parse_row_rejections() {
        let ctx = StatementContext::new(Month::Mar, 2023);
        assert_eq!(
            parse_row("PAYMENT THANK YOU", &ctx),
            Err(ParseSkip::PatternMismatch)
        );
        assert_eq!(
            parse_row("FEB 30 MAR 01 STORE $1.00", &ctx),
            Err(ParseSkip::InvalidDate {
                text: "FEB 30".to_string()
            })
        );
        assert_eq!(
            parse_row("ABC 03 MAR 04 STORE $1.00", &ctx),
            Err(ParseSkip::InvalidDate {
                text: "ABC 03".to_string()
            })
        );
    }

    #[test]
    fn test_reader_threads_context() {
        let mut reader = StatementReader::new();

        assert_eq!(
            reader.feed("NOV 28 NOV 29 EARLY ROW $1.00"),
            LineOutcome::Skipped(ParseSkip::MissingStatementContext)
        );
        assert_eq!(
            reader.feed("Date: Jan 2024"),
            LineOutcome::Context(StatementContext::new(Month::Jan, 2024))
        );
        assert!(matches!(
            reader.feed("DEC 28 DEC 29 GIFT SHOP $15.00"),
            LineOutcome::Transaction(t) if t.transaction_date == date(2023, 12, 28)
        ));
        assert_eq!(reader.feed("   "), LineOutcome::Ignored);
        assert_eq!(
            reader.feed("Date: Feb 2024"),
            LineOutcome::Context(StatementContext::new(Month::Feb, 2024))
        );
        assert!(matches!(
            reader.feed("FEB 02 FEB 03 GROCER $20.00"),
            LineOutcome::Transaction(t) if t.transaction_date == date(2024, 2, 2)
        ));

        assert_eq!(reader.skipped(), 1);
        let ledger = reader.finish();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total(), Decimal::from_str("35.00").unwrap());
    }

    #[test]
    fn test_unknown_header_month_clears_context() {
        let mut reader = StatementReader::new();
        reader.feed("Date: Aug 2022");
        assert!(matches!(
            reader.feed("AUG 10 AUG 11 STORE $2.00"),
            LineOutcome::Transaction(_)
        ));

        assert_eq!(reader.feed("Date: Sept 2023"), LineOutcome::ContextCleared);
        assert_eq!(reader.context(), None);
        assert_eq!(
            reader.feed("SEP 05 SEP 06 STORE $1.00"),
            LineOutcome::Skipped(ParseSkip::MissingStatementContext)
        );

        reader.feed("Date: Oct 2023");
        assert!(matches!(
            reader.feed("OCT 01 OCT 02 STORE $3.00"),
            LineOutcome::Transaction(t) if t.transaction_date == date(2023, 10, 1)
        ));

        let dates: Vec<NaiveDate> = reader
            .finish()
            .into_sorted()
            .iter()
            .map(|t| t.transaction_date)
            .collect();
        assert_eq!(dates, vec![date(2023, 10, 1), date(2022, 8, 10)]);
    }

    #[test]
    fn test_read_stream_sorted_records() {
        let stream = "Date: Dec 2023\n\
                      DEC 05 DEC 07 COFFEE SHOP $4.50\n\
                      JAN 02 JAN 03 BOOKSTORE $12.00\n\
                      DEC 20 DEC 21 REFUND -$3.25\n";

        let records: Vec<String> = read_stream(stream)
            .into_sorted()
            .iter()
            .map(|t| t.to_record())
            .collect();
        assert_eq!(
            records,
            vec![
                "Jan 02 2024;Jan 03 2024;BOOKSTORE;12.00",
                "Dec 20 2023;Dec 21 2023;REFUND;-3.25",
                "Dec 05 2023;Dec 07 2023;COFFEE SHOP;4.50",
            ]
        );
    }
}
