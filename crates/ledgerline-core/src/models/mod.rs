//! Data models for page geometry, transactions and configuration.

pub mod config;
pub mod geometry;
pub mod transaction;

pub use config::LedgerConfig;
pub use geometry::{DashPattern, LineSegment, Point, Rect, Region, Rgb, TextFragment};
pub use transaction::{Month, StatementContext, Transaction};
