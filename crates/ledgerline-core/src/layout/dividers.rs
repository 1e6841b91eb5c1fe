//! Row divider detection.
//!
//! Statement tables separate rows with many short, solid strokes sharing one
//! y-coordinate. Grouping horizontal in-region segments by their (rounded) y
//! and keeping the frequent groups recovers the row boundaries.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::models::config::DividerConfig;
use crate::models::geometry::{LineSegment, Region};

/// Whether `line` is a solid horizontal stroke lying fully inside `region`.
fn is_candidate(region: &Region, line: &LineSegment) -> bool {
    line.is_horizontal()
        && line.dash.is_solid()
        && region.spans_y(line.start.y)
        && region.spans_x(line.start.x)
        && region.spans_x(line.end.x)
}

/// Sorted row boundaries for `region`, starting at its top and ending at its
/// bottom. Strictly increasing.
///
/// With no qualifying divider the result is `[top, bottom]` and the whole
/// region is one row interval.
pub fn detect_dividers(region: &Region, lines: &[LineSegment], config: &DividerConfig) -> Vec<f64> {
    let factor = 10f64.powi(config.y_precision as i32);
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

    for line in lines.iter().filter(|line| is_candidate(region, line)) {
        *counts.entry((line.start.y * factor).round() as i64).or_insert(0) += 1;
    }

    let mut dividers = vec![region.top()];
    for (key, count) in &counts {
        let y = *key as f64 / factor;
        trace!("Divider candidate y={:.2}: {} segments", y, count);
        if *count >= config.threshold && y > region.top() && y < region.bottom() {
            dividers.push(y);
        }
    }
    dividers.push(region.bottom());

    if dividers.len() == 2 {
        debug!(
            "No row dividers detected (threshold {}), treating region as one interval",
            config.threshold
        );
    } else {
        debug!("Detected {} row dividers", dividers.len() - 2);
    }

    dividers
}
