//! The line-oriented text stream between table extraction and parsing.
//!
//! ```text
//! Date: Dec 2023
//! DEC 05 DEC 07 COFFEE SHOP $4.50
//! ```
//!
//! A `Date:` line sets the statement period for the rows that follow; every
//! other non-empty line is a row string, written verbatim. A `Date:` line
//! with a year but an unknown month name ends the current period without
//! starting a new one.

use std::path::Path;

use regex::Regex;

use crate::error::{LedgerError, Result};
use crate::layout::PageRows;
use crate::models::transaction::{Month, StatementContext};
use crate::statement::patterns::STATEMENT_HEADER;

const HEADER_PREFIX: &str = "Date:";

/// One line of the intermediate stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamLine {
    /// Statement period header.
    Header(StatementContext),
    /// Candidate transaction row.
    Row(String),
    /// Header with a year but no recognisable month, kept verbatim.
    UnknownPeriod(String),
}

impl StreamLine {
    /// Parse one line. Blank lines and `Date:` lines without a year yield
    /// `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if line.starts_with(HEADER_PREFIX) {
            let caps = STATEMENT_HEADER.captures(line)?;
            let year: i32 = caps[2].parse().ok()?;
            return Some(match Month::parse(&caps[1]) {
                Some(month) => StreamLine::Header(StatementContext::new(month, year)),
                None => StreamLine::UnknownPeriod(line.to_string()),
            });
        }

        Some(StreamLine::Row(line.to_string()))
    }
}

impl std::fmt::Display for StreamLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamLine::Header(context) => write!(f, "{} {}", HEADER_PREFIX, context),
            StreamLine::Row(row) | StreamLine::UnknownPeriod(row) => f.write_str(row),
        }
    }
}

/// Stream lines for one statement: its header, then every page's rows.
pub fn statement_lines(context: StatementContext, pages: &[PageRows]) -> Vec<StreamLine> {
    std::iter::once(StreamLine::Header(context))
        .chain(
            pages
                .iter()
                .flat_map(|page| page.rows.iter().cloned().map(StreamLine::Row)),
        )
        .collect()
}

/// Render stream lines as text, one per line.
pub fn render(lines: &[StreamLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Statement period encoded in a statement file name.
///
/// `pattern` must define `month` and `year` named groups; it is matched
/// against the file name only, not the directory.
pub fn statement_period_from_file_name(path: &Path, pattern: &str) -> Result<StatementContext> {
    let re = Regex::new(pattern)?;
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let period_error = || LedgerError::Period { file: file.clone() };

    let caps = re.captures(&file).ok_or_else(period_error)?;
    let month = caps
        .name("month")
        .and_then(|m| Month::parse(m.as_str()))
        .ok_or_else(period_error)?;
    let year: i32 = caps
        .name("year")
        .and_then(|y| y.as_str().parse().ok())
        .ok_or_else(period_error)?;

    Ok(StatementContext::new(month, year))
}

/// Parse a `"Dec 2023"` period as given on the command line.
pub fn parse_period(text: &str) -> Option<StatementContext> {
    let (month, year) = text.trim().split_once(char::is_whitespace)?;
    Some(StatementContext::new(
        Month::parse(month)?,
        year.trim().parse().ok()?,
    ))
}
