//! Error types for the ledgerline-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ledgerline library.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// A document could not be read at all.
    #[error("cannot read document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: PdfError,
    },

    /// The statement period could not be derived from a file name.
    #[error("cannot derive statement period from file name {file:?}")]
    Period { file: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid regular expression in configuration.
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// A page content stream could not be decoded.
    #[error("cannot read content of page {page}: {reason}")]
    Content { page: u32, reason: String },
}

/// Which table anchor was missing on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The header keyword fragment.
    Keyword,
    /// The qualifying horizontal boundary line.
    BoundaryLine,
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anchor::Keyword => write!(f, "keyword"),
            Anchor::BoundaryLine => write!(f, "boundary line"),
        }
    }
}

/// Reasons a page yields no transaction table. Never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageSkip {
    /// Keyword or boundary line not present on the page.
    #[error("{missing} anchor not found")]
    AnchorNotFound { missing: Anchor },

    /// Anchors resolve to a region with non-positive width or height.
    #[error("degenerate table region ({width:.2} x {height:.2})")]
    DegenerateRegion { width: f64, height: f64 },

    /// The page is listed in the excluded pages.
    #[error("page excluded by configuration")]
    ExcludedPage,
}

/// Reasons a row does not produce a transaction. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSkip {
    /// The row does not look like a transaction.
    #[error("row does not match the transaction pattern")]
    PatternMismatch,

    /// A row arrived before any statement header.
    #[error("no statement header seen yet")]
    MissingStatementContext,

    /// A date token matched but names no real calendar day.
    #[error("invalid date: {text}")]
    InvalidDate { text: String },

    /// An amount token matched but could not be converted.
    #[error("invalid amount: {text}")]
    InvalidAmount { text: String },
}

/// Result type for the ledgerline library.
pub type Result<T> = std::result::Result<T, LedgerError>;
