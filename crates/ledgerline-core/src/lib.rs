//! Core library for rebuilding statement transaction ledgers from PDF layout.
//!
//! This crate provides:
//! - Page geometry extraction (positioned text fragments and stroked lines)
//! - Transaction table reconstruction (anchors, region, row dividers, rows)
//! - The line-oriented intermediate text stream between layout and parsing
//! - Transaction row parsing with statement-aware year inference
//! - Ledger aggregation in reverse-chronological order

pub mod error;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod statement;
pub mod stream;

pub use error::{LedgerError, PageSkip, ParseSkip, PdfError, Result};
pub use layout::{DocumentRows, PageRows, TableExtractor};
pub use models::config::LedgerConfig;
pub use models::geometry::{DashPattern, LineSegment, Point, Rect, Region, Rgb, TextFragment};
pub use models::transaction::{Month, StatementContext, Transaction};
pub use pdf::{GeometrySource, PageGeometry, PdfGeometryExtractor};
pub use statement::{Ledger, StatementReader};
pub use stream::StreamLine;
