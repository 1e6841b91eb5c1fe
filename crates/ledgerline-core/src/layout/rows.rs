//! Row assembly: bin in-region fragments into divider intervals.

use tracing::trace;

use crate::models::geometry::{Region, TextFragment};

/// Index of the first interval `(dividers[i], dividers[i + 1] + margin]`
/// containing `y`.
fn interval_of(y: f64, dividers: &[f64], margin: f64) -> Option<usize> {
    dividers
        .windows(2)
        .position(|w| w[0] < y && y <= w[1] + margin)
}

/// Build one string per non-empty row interval, top to bottom.
///
/// A fragment belongs to the region when its top-left corner does. Inside a
/// row, fragments are ordered by their left edge and joined with single
/// spaces. Fragments with equal keys keep their input order.
pub fn assemble_rows(
    region: &Region,
    fragments: &[TextFragment],
    dividers: &[f64],
    row_margin: f64,
) -> Vec<String> {
    let mut inside: Vec<&TextFragment> = fragments
        .iter()
        .filter(|f| region.contains_point(f.bbox.x0, f.bbox.y0))
        .collect();
    inside.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    let mut rows: Vec<Vec<&TextFragment>> = vec![Vec::new(); dividers.len().saturating_sub(1)];
    for fragment in inside {
        match interval_of(fragment.bbox.y0, dividers, row_margin) {
            Some(index) => rows[index].push(fragment),
            None => trace!("Fragment {:?} falls in no row interval", fragment.text),
        }
    }

    rows.into_iter()
        .filter(|row| !row.is_empty())
        .map(|mut row| {
            row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            row.iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::Rect;
    use pretty_assertions::assert_eq;

    fn region() -> Region {
        Region(Rect::new(48.0, 112.0, 400.0, 500.0))
    }

    fn at(text: &str, x0: f64, y0: f64) -> TextFragment {
        TextFragment::new(text, Rect::new(x0, y0, x0 + 30.0, y0 + 8.0), 1)
    }

    const DIVIDERS: [f64; 5] = [112.0, 150.0, 200.0, 250.0, 500.0];

    #[test]
    fn test_fragments_grouped_and_ordered() {
        let fragments = vec![
            at("$4.50", 350.0, 160.0),
            at("DEC 05", 50.0, 160.0),
            at("COFFEE", 150.0, 161.0),
            at("DEC 07", 100.0, 160.0),
            at("DEC 01", 50.0, 120.0),
            at("OPENING", 150.0, 120.0),
        ];

        assert_eq!(
            assemble_rows(&region(), &fragments, &DIVIDERS, 0.0),
            vec![
                "DEC 01 OPENING".to_string(),
                "DEC 05 DEC 07 COFFEE $4.50".to_string(),
            ]
        );
    }

    #[test]
    fn test_fragments_outside_region_dropped() {
        let fragments = vec![
            at("TRANSACTION", 50.0, 100.0),
            at("FOOTER", 50.0, 520.0),
            at("MARGIN NOTE", 20.0, 160.0),
            at("KEPT", 60.0, 160.0),
        ];

        assert_eq!(
            assemble_rows(&region(), &fragments, &DIVIDERS, 0.0),
            vec!["KEPT".to_string()]
        );
    }

    #[test]
    fn test_fragment_on_divider_belongs_to_row_above() {
        let fragments = vec![at("ON LINE", 60.0, 150.0), at("BELOW", 60.0, 151.0)];

        assert_eq!(
            assemble_rows(&region(), &fragments, &DIVIDERS, 0.0),
            vec!["ON LINE".to_string(), "BELOW".to_string()]
        );
    }

    #[test]
    fn test_row_margin_extends_interval_downward() {
        let fragments = vec![at("A", 60.0, 140.0), at("B", 80.0, 151.0)];

        assert_eq!(
            assemble_rows(&region(), &fragments, &DIVIDERS, 2.0),
            vec!["A B".to_string()]
        );
    }

    #[test]
    fn test_fragment_on_region_top_is_unassigned() {
        let fragments = vec![at("HEADER EDGE", 60.0, 112.0)];
        assert!(assemble_rows(&region(), &fragments, &DIVIDERS, 0.0).is_empty());
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let fragments = vec![
            at("X", 200.0, 210.0),
            at("Y", 60.0, 210.0),
            at("Z", 60.0, 300.0),
        ];

        let first = assemble_rows(&region(), &fragments, &DIVIDERS, 0.0);
        let second = assemble_rows(&region(), &fragments, &DIVIDERS, 0.0);
        assert_eq!(first, second);
        assert_eq!(first, vec!["Y X".to_string(), "Z".to_string()]);
    }
}
