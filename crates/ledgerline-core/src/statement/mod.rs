//! Statement row parsing and ledger aggregation.

pub mod amounts;
pub mod dates;
pub mod ledger;
pub mod parser;
pub mod patterns;

pub use amounts::{format_amount, parse_amount};
pub use dates::{parse_month_day, resolve_row_dates};
pub use ledger::Ledger;
pub use parser::{LineOutcome, StatementReader, parse_row, read_stream};
