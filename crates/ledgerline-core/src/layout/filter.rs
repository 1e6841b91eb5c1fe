//! Boilerplate row filter.

use tracing::trace;

/// Drops rows containing any of a fixed set of substrings.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    excluded: Vec<String>,
}

impl RowFilter {
    pub fn new(excluded: &[String]) -> Self {
        Self {
            excluded: excluded
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Whether `row` contains one of the excluded substrings.
    pub fn is_excluded(&self, row: &str) -> bool {
        self.excluded.iter().any(|needle| row.contains(needle.as_str()))
    }

    /// Keep the rows that are not excluded, in order.
    pub fn apply(&self, rows: Vec<String>) -> Vec<String> {
        rows.into_iter()
            .filter(|row| {
                let excluded = self.is_excluded(row);
                if excluded {
                    trace!("Filtered row: {}", row);
                }
                !excluded
            })
            .collect()
    }
}
