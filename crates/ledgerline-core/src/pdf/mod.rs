//! PDF processing module.
//!
//! Turns document pages into [`PageGeometry`]: positioned text fragments and
//! stroked line segments, in top-left-origin page coordinates.

mod content;
mod extractor;
mod font;
mod object;

pub use extractor::PdfGeometryExtractor;

use crate::error::PdfError;
use crate::models::geometry::{LineSegment, TextFragment};

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Everything the layout stages need from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageGeometry {
    /// Page number (1-indexed).
    pub number: u32,
    /// Page width in points.
    pub width: f64,
    /// Page height in points.
    pub height: f64,
    /// Text runs in content-stream order.
    pub fragments: Vec<TextFragment>,
    /// Straight stroked segments in content-stream order.
    pub lines: Vec<LineSegment>,
}

impl PageGeometry {
    pub fn new(number: u32, width: f64, height: f64) -> Self {
        Self {
            number,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_fragments(mut self, fragments: Vec<TextFragment>) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn with_lines(mut self, lines: Vec<LineSegment>) -> Self {
        self.lines = lines;
        self
    }
}

/// Anything that can hand out page geometry for a document.
pub trait GeometrySource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Geometry of a single page (1-indexed).
    fn page(&self, number: u32) -> Result<PageGeometry>;
}

impl GeometrySource for Vec<PageGeometry> {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageGeometry> {
        number
            .checked_sub(1)
            .and_then(|i| self.get(i as usize))
            .cloned()
            .ok_or(PdfError::InvalidPage(number))
    }
}
