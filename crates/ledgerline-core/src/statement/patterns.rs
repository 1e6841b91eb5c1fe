//! Common regex patterns for statement rows and headers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Transaction row: two `MON DD` dates, a description and a dollar amount
    pub static ref TRANSACTION_ROW: Regex = Regex::new(
        r"(\b[A-Z]{3} \d{1,2}\b)\s+(\b[A-Z]{3} \d{1,2}\b)\s+(.*?)\s+(-?\$(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})"
    ).unwrap();

    // A single `MON DD` token
    pub static ref MONTH_DAY: Regex = Regex::new(
        r"^([A-Z]{3}) (\d{1,2})$"
    ).unwrap();

    // Statement header line of the intermediate stream
    pub static ref STATEMENT_HEADER: Regex = Regex::new(
        r"^Date:\s*(\w+)\s*(\d{4})"
    ).unwrap();
}
