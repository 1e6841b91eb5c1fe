//! Table region derived from the two anchors.

use tracing::debug;

use crate::error::PageSkip;
use crate::models::geometry::{LineSegment, Rect, Region};

/// Build the table region: below the keyword, left of it by `margin`, out to
/// the boundary line's right end and down to its y.
pub fn resolve_region(
    keyword: &Rect,
    boundary: &LineSegment,
    margin: f64,
) -> Result<Region, PageSkip> {
    let rect = Rect::new(
        keyword.x0 - margin,
        keyword.y0 + keyword.height(),
        boundary.start.x.max(boundary.end.x),
        boundary.end.y,
    );

    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(PageSkip::DegenerateRegion {
            width: rect.width(),
            height: rect.height(),
        });
    }

    debug!(
        "Table region ({:.2}, {:.2}) - ({:.2}, {:.2})",
        rect.x0, rect.y0, rect.x1, rect.y1
    );
    Ok(Region(rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::Point;

    #[test]
    fn test_region_from_anchors() {
        let keyword = Rect::new(50.0, 100.0, 150.0, 112.0);
        let boundary = LineSegment::new(Point::new(50.0, 500.0), Point::new(400.0, 500.0));

        let region = resolve_region(&keyword, &boundary, 2.0).unwrap();
        assert_eq!(region.left(), 48.0);
        assert_eq!(region.top(), 112.0);
        assert_eq!(region.right(), 400.0);
        assert_eq!(region.bottom(), 500.0);
    }

    #[test]
    fn test_boundary_above_keyword_is_degenerate() {
        let keyword = Rect::new(50.0, 600.0, 150.0, 612.0);
        let boundary = LineSegment::new(Point::new(50.0, 500.0), Point::new(400.0, 500.0));

        assert!(matches!(
            resolve_region(&keyword, &boundary, 2.0),
            Err(PageSkip::DegenerateRegion { .. })
        ));
    }

    #[test]
    fn test_boundary_left_of_keyword_is_degenerate() {
        let keyword = Rect::new(500.0, 100.0, 550.0, 112.0);
        let boundary = LineSegment::new(Point::new(50.0, 500.0), Point::new(300.0, 500.0));

        assert_eq!(
            resolve_region(&keyword, &boundary, 2.0),
            Err(PageSkip::DegenerateRegion {
                width: -198.0,
                height: 388.0
            })
        );
    }
}
