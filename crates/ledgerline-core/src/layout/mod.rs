//! Transaction table reconstruction from page geometry.
//!
//! The stages run in order for every page: anchors, region, row dividers,
//! row assembly, boilerplate filtering. Each stage is a pure function of the
//! page's primitives; [`TableExtractor`] wires them together with the
//! configured parameters.

pub mod anchor;
pub mod dividers;
pub mod filter;
pub mod region;
pub mod rows;

use tracing::debug;

use crate::error::{PageSkip, PdfError};
use crate::models::config::LayoutConfig;
use crate::models::geometry::Region;
use crate::pdf::{GeometrySource, PageGeometry};

pub use anchor::{Anchors, find_boundary_line, find_keyword, locate_anchors};
pub use dividers::detect_dividers;
pub use filter::RowFilter;
pub use region::resolve_region;
pub use rows::assemble_rows;

/// The transaction rows recovered from one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRows {
    /// Page number (1-indexed).
    pub page: u32,
    /// Table region the rows were taken from.
    pub region: Region,
    /// Row boundaries, region top first and region bottom last.
    pub dividers: Vec<f64>,
    /// Row strings, top to bottom, boilerplate removed.
    pub rows: Vec<String>,
}

/// The rows of a whole document, with the pages that yielded none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentRows {
    /// Pages with a transaction table, in page order.
    pub pages: Vec<PageRows>,
    /// Page numbers without a table, and why.
    pub skipped: Vec<(u32, PageSkip)>,
}

/// Runs the table reconstruction stages for a page.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    config: LayoutConfig,
    filter: RowFilter,
}

impl TableExtractor {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            config: config.clone(),
            filter: RowFilter::new(&config.excluded_rows),
        }
    }

    /// Recover the transaction rows of one page, or the reason it has none.
    pub fn extract_page(&self, page: &PageGeometry) -> Result<PageRows, PageSkip> {
        if self.config.exclude_pages.contains(&page.number) {
            return Err(PageSkip::ExcludedPage);
        }

        let anchors = locate_anchors(
            &page.fragments,
            &page.lines,
            &self.config.keyword,
            &self.config.boundary_line,
        )?;
        let region = resolve_region(&anchors.keyword, &anchors.boundary, self.config.region_margin)?;
        let dividers = detect_dividers(&region, &page.lines, &self.config.dividers);

        let rows = assemble_rows(&region, &page.fragments, &dividers, self.config.row_margin);
        let assembled = rows.len();
        let rows = self.filter.apply(rows);

        debug!(
            "Page {}: {} rows assembled, {} kept",
            page.number,
            assembled,
            rows.len()
        );

        Ok(PageRows {
            page: page.number,
            region,
            dividers,
            rows,
        })
    }

    /// Recover the rows of every page of a document, in page order. Pages
    /// without a table are collected in [`DocumentRows::skipped`]; a page
    /// that cannot be read fails the whole document.
    pub fn extract_document<S: GeometrySource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<DocumentRows, PdfError> {
        let mut document = DocumentRows::default();
        for number in 1..=source.page_count() {
            let geometry = source.page(number)?;
            match self.extract_page(&geometry) {
                Ok(rows) => document.pages.push(rows),
                Err(skip) => {
                    debug!("Skipping page {}: {}", number, skip);
                    document.skipped.push((number, skip));
                }
            }
        }
        Ok(document)
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}
