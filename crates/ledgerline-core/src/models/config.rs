//! Configuration structures for the ledger pipeline.
//!
//! Defaults match the one statement layout family the anchors and thresholds
//! were tuned on; every value can be overridden from a JSON file.

use serde::{Deserialize, Serialize};

use super::geometry::Rgb;

/// Main configuration for the ledgerline pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Table reconstruction configuration.
    pub layout: LayoutConfig,

    /// Statement period configuration.
    pub statement: StatementConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Table reconstruction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Text whose first occurrence marks the table's top-left corner.
    pub keyword: String,

    /// Horizontal margin subtracted from the keyword's left edge.
    pub region_margin: f64,

    /// Slack added below each divider when binning fragments into rows.
    pub row_margin: f64,

    /// Style of the line marking the table's right/bottom extent.
    pub boundary_line: LineStyleFilter,

    /// Row divider detection.
    pub dividers: DividerConfig,

    /// Rows containing any of these substrings are dropped.
    pub excluded_rows: Vec<String>,

    /// Page numbers (1-indexed) never scanned for a table.
    pub exclude_pages: Vec<u32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            keyword: "TRANSACTION".to_string(),
            region_margin: 2.0,
            row_margin: 0.0,
            boundary_line: LineStyleFilter::default(),
            dividers: DividerConfig::default(),
            excluded_rows: vec![
                "PREVIOUS STATEMENT BALANCE".to_string(),
                "Continued".to_string(),
                "NET ACTIVITY AMOUNT OF MONTHLY".to_string(),
            ],
            exclude_pages: Vec::new(),
        }
    }
}

/// Style constraints for the boundary line anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyleFilter {
    /// Required stroke alpha.
    pub stroke_opacity: f64,

    /// Required stroke color.
    pub color: Rgb,

    /// Minimum absolute line width.
    pub min_width: f64,

    /// Minimum horizontal length.
    pub min_length: f64,

    /// Tolerance used when comparing opacity and color components.
    pub tolerance: f64,
}

impl Default for LineStyleFilter {
    fn default() -> Self {
        Self {
            stroke_opacity: 1.0,
            color: Rgb::BLACK,
            min_width: 1.0,
            min_length: 200.0,
            tolerance: 1e-3,
        }
    }
}

/// Row divider detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerConfig {
    /// Minimum number of segments sharing a y-coordinate.
    pub threshold: usize,

    /// Decimal places y-coordinates are rounded to before grouping.
    pub y_precision: u32,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            threshold: 50,
            y_precision: 2,
        }
    }
}

/// Statement period configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Regex with `month` and `year` named groups, matched against file names.
    pub file_pattern: String,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            // e.g. "Statement_Card_1234_Acct_Visa_Dec_15-2023.pdf"
            file_pattern: r"^(?:[^_]*_){5}(?P<month>[^_]+)_[^_]*?-(?P<year>\d{4})(?:\.pdf)?$"
                .to_string(),
        }
    }
}

/// Record rendering formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `Mon DD YYYY;Mon DD YYYY;description;amount`
    #[default]
    Semicolon,
    /// JSON array of transactions.
    Json,
    /// CSV with a header row.
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "semicolon" | "text" => Ok(OutputFormat::Semicolon),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "unknown output format '{}' (expected semicolon, json or csv)",
                other
            )),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default record format.
    pub format: OutputFormat,

    /// Print transaction count and total after the records.
    pub summary: bool,
}

impl LedgerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
