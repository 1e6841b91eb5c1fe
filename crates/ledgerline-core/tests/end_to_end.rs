//! Full pipeline tests: PDF bytes to page rows to ledger records.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pretty_assertions::assert_eq;

use ledgerline_core::statement::read_stream;
use ledgerline_core::stream::{render, statement_lines};
use ledgerline_core::{
    GeometrySource, LineSegment, Month, PageGeometry, PdfGeometryExtractor, Point, Rect,
    StatementContext, TableExtractor, TextFragment,
};

const PAGE_HEIGHT: i64 = 792;

/// Text drawn with its baseline at top-left-origin `y` (10pt Helvetica).
fn text(operations: &mut Vec<Operation>, s: &str, x: i64, baseline: i64) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
    operations.push(Operation::new("Td", vec![x.into(), (PAGE_HEIGHT - baseline).into()]));
    operations.push(Operation::new("Tj", vec![Object::string_literal(s)]));
    operations.push(Operation::new("ET", vec![]));
}

/// Sixty 5pt solid strokes at top-left-origin `y`.
fn separator(operations: &mut Vec<Operation>, y: i64) {
    for i in 0..60 {
        let x = 50 + i * 5;
        operations.push(Operation::new("m", vec![x.into(), (PAGE_HEIGHT - y).into()]));
        operations.push(Operation::new("l", vec![(x + 5).into(), (PAGE_HEIGHT - y).into()]));
    }
    operations.push(Operation::new("S", vec![]));
}

fn statement_page_operations() -> Vec<Operation> {
    let mut ops = Vec::new();

    text(&mut ops, "TRANSACTION", 50, 112);
    text(&mut ops, "PREVIOUS STATEMENT BALANCE $100.00", 60, 138);

    ops.push(Operation::new("w", vec![1.into()]));
    ops.push(Operation::new("RG", vec![0.into(), 0.into(), 0.into()]));
    for y in [150, 200, 250] {
        separator(&mut ops, y);
    }
    // A lone stroke that must not become a divider.
    ops.push(Operation::new("m", vec![60.into(), (PAGE_HEIGHT - 175).into()]));
    ops.push(Operation::new("l", vec![90.into(), (PAGE_HEIGHT - 175).into()]));
    ops.push(Operation::new("S", vec![]));

    text(&mut ops, "DEC 05", 50, 168);
    text(&mut ops, "DEC 07", 100, 168);
    text(&mut ops, "COFFEE SHOP", 150, 168);
    text(&mut ops, "$4.50", 350, 168);

    text(&mut ops, "JAN 02", 50, 218);
    text(&mut ops, "JAN 03", 100, 218);
    text(&mut ops, "BOOKSTORE", 150, 218);
    text(&mut ops, "-$12.00", 350, 218);

    text(&mut ops, "Continued on next page", 50, 268);

    // Boundary line.
    ops.push(Operation::new("m", vec![50.into(), (PAGE_HEIGHT - 500).into()]));
    ops.push(Operation::new("l", vec![400.into(), (PAGE_HEIGHT - 500).into()]));
    ops.push(Operation::new("S", vec![]));

    text(&mut ops, "Page 1 of 1", 50, 700);
    ops
}

fn build_pdf(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

#[test]
fn test_generated_pdf_to_rows() {
    let cover = {
        let mut ops = Vec::new();
        text(&mut ops, "Your statement is ready", 50, 100);
        ops
    };
    let data = build_pdf(vec![cover, statement_page_operations()]);

    let mut extractor = PdfGeometryExtractor::new();
    extractor.load(&data).unwrap();
    assert_eq!(extractor.page_count(), 2);

    let pages = TableExtractor::default()
        .extract_document(&extractor)
        .unwrap()
        .pages;
    assert_eq!(pages.len(), 1);

    let page = &pages[0];
    assert_eq!(page.page, 2);
    assert_eq!(page.dividers, vec![114.0, 150.0, 200.0, 250.0, 500.0]);
    assert_eq!(
        page.rows,
        vec![
            "DEC 05 DEC 07 COFFEE SHOP $4.50".to_string(),
            "JAN 02 JAN 03 BOOKSTORE -$12.00".to_string(),
        ]
    );
}

#[test]
fn test_generated_pdf_to_ledger() {
    let data = build_pdf(vec![statement_page_operations()]);
    let mut extractor = PdfGeometryExtractor::new();
    extractor.load(&data).unwrap();

    let pages = TableExtractor::default()
        .extract_document(&extractor)
        .unwrap()
        .pages;
    let stream = render(&statement_lines(
        StatementContext::new(Month::Dec, 2023),
        &pages,
    ));

    let records: Vec<String> = read_stream(&stream)
        .into_sorted()
        .iter()
        .map(|t| t.to_record())
        .collect();
    assert_eq!(
        records,
        vec![
            "Jan 02 2024;Jan 03 2024;BOOKSTORE;-12.00".to_string(),
            "Dec 05 2023;Dec 07 2023;COFFEE SHOP;4.50".to_string(),
        ]
    );
}

#[test]
fn test_synthetic_page_dividers() {
    let mut lines = vec![LineSegment::new(
        Point::new(50.0, 500.0),
        Point::new(400.0, 500.0),
    )];
    for y in [150.0, 200.0, 250.0] {
        for i in 0..60 {
            let x = 50.0 + i as f64 * 5.0;
            lines.push(LineSegment::new(Point::new(x, y), Point::new(x + 5.0, y)));
        }
    }
    lines.push(LineSegment::new(Point::new(60.0, 175.0), Point::new(300.0, 175.0)));

    let page = PageGeometry::new(1, 612.0, 792.0)
        .with_fragments(vec![TextFragment::new(
            "TRANSACTION",
            Rect::new(50.0, 100.0, 150.0, 112.0),
            1,
        )])
        .with_lines(lines);

    let rows = TableExtractor::default().extract_page(&page).unwrap();
    assert_eq!(rows.dividers, vec![112.0, 150.0, 200.0, 250.0, 500.0]);
    assert!(rows.rows.is_empty());
}

#[test]
fn test_continued_rows_never_reach_parser() {
    let data = build_pdf(vec![statement_page_operations()]);
    let mut extractor = PdfGeometryExtractor::new();
    extractor.load(&data).unwrap();

    let pages = TableExtractor::default()
        .extract_document(&extractor)
        .unwrap()
        .pages;
    assert!(
        pages
            .iter()
            .flat_map(|p| p.rows.iter())
            .all(|row| !row.contains("Continued"))
    );
}
