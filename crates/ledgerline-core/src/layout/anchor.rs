//! Table anchors: the header keyword and the boundary line.

use tracing::{debug, trace};

use crate::error::{Anchor, PageSkip};
use crate::models::config::LineStyleFilter;
use crate::models::geometry::{LineSegment, Rect, TextFragment};

/// Both anchors of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchors {
    /// Bounding box of the keyword fragment.
    pub keyword: Rect,
    /// The qualifying boundary line.
    pub boundary: LineSegment,
}

/// Bounding box of the first fragment whose text contains `keyword`.
pub fn find_keyword(fragments: &[TextFragment], keyword: &str) -> Option<Rect> {
    fragments
        .iter()
        .find(|f| f.text.contains(keyword))
        .map(|f| f.bbox)
}

impl LineStyleFilter {
    /// Whether `line` is a horizontal stroke of the configured style.
    pub fn matches(&self, line: &LineSegment) -> bool {
        line.is_horizontal()
            && (line.stroke_opacity - self.stroke_opacity).abs() <= self.tolerance
            && line.color.approx_eq(&self.color, self.tolerance)
            && line.width.abs() >= self.min_width
            && line.length_x() >= self.min_length
    }
}

/// First line segment matching the boundary style.
pub fn find_boundary_line<'a>(
    lines: &'a [LineSegment],
    style: &LineStyleFilter,
) -> Option<&'a LineSegment> {
    lines.iter().find(|line| style.matches(line))
}

/// Locate both anchors, naming the first one that is missing.
pub fn locate_anchors(
    fragments: &[TextFragment],
    lines: &[LineSegment],
    keyword: &str,
    style: &LineStyleFilter,
) -> Result<Anchors, PageSkip> {
    let keyword_bbox = find_keyword(fragments, keyword).ok_or(PageSkip::AnchorNotFound {
        missing: Anchor::Keyword,
    })?;
    trace!("Keyword {:?} at {:?}", keyword, keyword_bbox);

    let boundary = find_boundary_line(lines, style).ok_or(PageSkip::AnchorNotFound {
        missing: Anchor::BoundaryLine,
    })?;

    debug!(
        "Anchors: keyword at ({:.2}, {:.2}), boundary line ({:.2}, {:.2}) - ({:.2}, {:.2})",
        keyword_bbox.x0,
        keyword_bbox.y0,
        boundary.start.x,
        boundary.start.y,
        boundary.end.x,
        boundary.end.y
    );

    Ok(Anchors {
        keyword: keyword_bbox,
        boundary: boundary.clone(),
    })
}
