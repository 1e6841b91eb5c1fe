//! Content stream interpreter producing positioned text runs and stroked lines.
//!
//! Tracks the graphics and text state of a page's content stream, converts
//! shown strings into text fragments and stroke-only paths into line segments.
//! Output coordinates are top-left-origin page coordinates.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};
use tracing::{debug, trace};

use super::font::FontInfo;
use super::object::{number, resolve, resource_entry};
use crate::error::PdfError;
use crate::models::geometry::{DashPattern, LineSegment, Point, Rect, Rgb, TextFragment};

/// Nested Form XObjects deeper than this are not interpreted.
const MAX_FORM_DEPTH: usize = 8;
/// Glyph box above the baseline, in ems.
const ASCENT: f64 = 0.8;
/// Glyph box below the baseline, in ems.
const DESCENT: f64 = 0.2;
/// Gaps up to this fraction of the font size join runs without a space.
const JOIN_GAP: f64 = 0.15;
/// Gaps up to this fraction of the font size join runs with a space.
const WORD_GAP: f64 = 0.5;

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn from_operands(ops: &[Object]) -> Option<Self> {
        Some(Self::new(
            operand(ops, 0)?,
            operand(ops, 1)?,
            operand(ops, 2)?,
            operand(ops, 3)?,
            operand(ops, 4)?,
            operand(ops, 5)?,
        ))
    }

    /// `self × other`: apply `self` first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Average linear scale, used for line widths.
    fn scale(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

/// Graphics state saved and restored by `q` / `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    line_width: f64,
    stroke_color: Rgb,
    stroke_alpha: f64,
    dash: DashPattern,
    font: Option<Vec<u8>>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    h_scale: f64,
    leading: f64,
    rise: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            line_width: 1.0,
            stroke_color: Rgb::BLACK,
            stroke_alpha: 1.0,
            dash: DashPattern::solid(),
            font: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Text shown by consecutive operators on one baseline, in PDF space.
#[derive(Debug, Clone)]
struct TextRun {
    text: String,
    font: Option<Vec<u8>>,
    size: f64,
    baseline: f64,
    x0: f64,
    x1: f64,
}

enum ShowItem<'b> {
    Text(&'b [u8]),
    Adjust(f64),
}

/// Interpreter for one page.
pub(crate) struct PageInterpreter<'a> {
    doc: &'a Document,
    page: u32,
    media_box: Rect,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    tm: Matrix,
    tlm: Matrix,
    path: Vec<(Point, Point)>,
    current: Option<Point>,
    subpath_start: Option<Point>,
    run: Option<TextRun>,
    fragments: Vec<TextFragment>,
    lines: Vec<LineSegment>,
}

impl<'a> PageInterpreter<'a> {
    /// `media_box` is in PDF space (bottom-left origin).
    pub fn new(doc: &'a Document, page: u32, media_box: Rect) -> Self {
        Self {
            doc,
            page,
            media_box,
            state: GraphicsState::default(),
            stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            path: Vec::new(),
            current: None,
            subpath_start: None,
            run: None,
            fragments: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Interpret the page content and return its fragments and line segments.
    pub fn interpret(
        mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
    ) -> Result<(Vec<TextFragment>, Vec<LineSegment>), PdfError> {
        self.run_stream(content, resources, 0)?;
        self.flush_run();

        debug!(
            "Page {}: {} text fragments, {} line segments",
            self.page,
            self.fragments.len(),
            self.lines.len()
        );
        Ok((self.fragments, self.lines))
    }

    fn run_stream(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        depth: usize,
    ) -> Result<(), PdfError> {
        let content = Content::decode(content).map_err(|e| PdfError::Content {
            page: self.page,
            reason: e.to_string(),
        })?;
        let mut fonts: HashMap<Vec<u8>, FontInfo> = HashMap::new();

        for op in &content.operations {
            let ops = op.operands.as_slice();
            match op.operator.as_str() {
                // --- Graphics state ---
                "q" => self.stack.push(self.state.clone()),
                "Q" => {
                    if let Some(state) = self.stack.pop() {
                        self.state = state;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(ops) {
                        self.state.ctm = m.multiply(&self.state.ctm);
                    }
                }
                "w" => {
                    if let Some(w) = operand(ops, 0) {
                        self.state.line_width = w;
                    }
                }
                "d" => {
                    if let Some(dash) = dash_from_operands(self.doc, ops) {
                        self.state.dash = dash;
                    }
                }
                "gs" => {
                    if let Some(name) = ops.first().and_then(|o| o.as_name().ok()) {
                        self.apply_ext_gstate(resources, name);
                    }
                }

                // --- Stroke color ---
                "G" => {
                    if let Some(g) = operand(ops, 0) {
                        self.state.stroke_color = Rgb::gray(g);
                    }
                }
                "RG" => {
                    if let Some(color) = color_from_components(&components(ops)) {
                        self.state.stroke_color = color;
                    }
                }
                "K" => {
                    if let Some(color) = color_from_components(&components(ops)) {
                        self.state.stroke_color = color;
                    }
                }
                "SC" | "SCN" => {
                    if let Some(color) = color_from_components(&components(ops)) {
                        self.state.stroke_color = color;
                    }
                }

                // --- Text state ---
                "BT" => {
                    self.tm = Matrix::IDENTITY;
                    self.tlm = Matrix::IDENTITY;
                }
                "ET" => {}
                "Tf" => {
                    if let Some(name) = ops.first().and_then(|o| o.as_name().ok()) {
                        if !fonts.contains_key(name) {
                            let font = resource_entry(self.doc, resources, b"Font", name)
                                .map(|dict| FontInfo::load(self.doc, dict))
                                .unwrap_or_default();
                            fonts.insert(name.to_vec(), font);
                        }
                        self.state.font = Some(name.to_vec());
                    }
                    if let Some(size) = operand(ops, 1) {
                        self.state.font_size = size;
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(ops) {
                        self.tm = m;
                        self.tlm = m;
                    }
                }
                "Td" => {
                    if let (Some(tx), Some(ty)) = (operand(ops, 0), operand(ops, 1)) {
                        self.move_text(tx, ty);
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) = (operand(ops, 0), operand(ops, 1)) {
                        self.state.leading = -ty;
                        self.move_text(tx, ty);
                    }
                }
                "T*" => self.next_line(),
                "Tc" => {
                    if let Some(v) = operand(ops, 0) {
                        self.state.char_spacing = v;
                    }
                }
                "Tw" => {
                    if let Some(v) = operand(ops, 0) {
                        self.state.word_spacing = v;
                    }
                }
                "Tz" => {
                    if let Some(v) = operand(ops, 0) {
                        self.state.h_scale = v / 100.0;
                    }
                }
                "TL" => {
                    if let Some(v) = operand(ops, 0) {
                        self.state.leading = v;
                    }
                }
                "Ts" => {
                    if let Some(v) = operand(ops, 0) {
                        self.state.rise = v;
                    }
                }

                // --- Text showing ---
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = ops.first() {
                        self.show(&fonts, &[ShowItem::Text(bytes)]);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(elements)) = ops.first() {
                        let items: Vec<ShowItem> = elements
                            .iter()
                            .filter_map(|e| match e {
                                Object::String(bytes, _) => Some(ShowItem::Text(bytes)),
                                other => number(other).map(ShowItem::Adjust),
                            })
                            .collect();
                        self.show(&fonts, &items);
                    }
                }
                "'" => {
                    self.next_line();
                    if let Some(Object::String(bytes, _)) = ops.first() {
                        self.show(&fonts, &[ShowItem::Text(bytes)]);
                    }
                }
                "\"" => {
                    if let (Some(aw), Some(ac)) = (operand(ops, 0), operand(ops, 1)) {
                        self.state.word_spacing = aw;
                        self.state.char_spacing = ac;
                    }
                    self.next_line();
                    if let Some(Object::String(bytes, _)) = ops.get(2) {
                        self.show(&fonts, &[ShowItem::Text(bytes)]);
                    }
                }

                // --- Path construction ---
                "m" => {
                    if let (Some(x), Some(y)) = (operand(ops, 0), operand(ops, 1)) {
                        let p = self.device_point(x, y);
                        self.current = Some(p);
                        self.subpath_start = Some(p);
                    }
                }
                "l" => {
                    if let (Some(x), Some(y)) = (operand(ops, 0), operand(ops, 1)) {
                        let p = self.device_point(x, y);
                        if let Some(from) = self.current {
                            self.path.push((from, p));
                        }
                        self.current = Some(p);
                    }
                }
                "c" => self.move_current(operand(ops, 4), operand(ops, 5)),
                "v" | "y" => self.move_current(operand(ops, 2), operand(ops, 3)),
                "re" => {
                    // Rectangles are not line items; only the current point moves.
                    if let (Some(x), Some(y)) = (operand(ops, 0), operand(ops, 1)) {
                        let p = self.device_point(x, y);
                        self.current = Some(p);
                        self.subpath_start = Some(p);
                    }
                }
                "h" => self.close_subpath(),

                // --- Path painting ---
                "S" => {
                    self.stroke_path();
                    self.clear_path();
                }
                "s" => {
                    self.close_subpath();
                    self.stroke_path();
                    self.clear_path();
                }
                "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" | "n" => self.clear_path(),

                // --- XObjects ---
                "Do" => {
                    if let Some(name) = ops.first().and_then(|o| o.as_name().ok()) {
                        self.run_form(resources, name, depth)?;
                    }
                }

                _ => {}
            }
        }

        Ok(())
    }

    fn run_form(
        &mut self,
        resources: Option<&'a Dictionary>,
        name: &[u8],
        depth: usize,
    ) -> Result<(), PdfError> {
        if depth >= MAX_FORM_DEPTH {
            trace!("Skipping form XObject nested {} deep", depth);
            return Ok(());
        }

        let doc = self.doc;
        let Some(xobjects) = resources
            .and_then(|r| r.get(b"XObject").ok())
            .and_then(|o| resolve(doc, o).as_dict().ok())
        else {
            return Ok(());
        };
        let Some(Object::Stream(stream)) = xobjects.get(name).ok().map(|o| resolve(doc, o)) else {
            return Ok(());
        };
        if stream.dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok()) != Some(b"Form".as_slice()) {
            return Ok(());
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .or(resources);
        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .and_then(|arr| Matrix::from_operands(arr))
            .unwrap_or(Matrix::IDENTITY);

        self.stack.push(self.state.clone());
        self.state.ctm = matrix.multiply(&self.state.ctm);
        let saved_tm = (self.tm, self.tlm);
        let result = self.run_stream(&data, form_resources, depth + 1);
        self.tm = saved_tm.0;
        self.tlm = saved_tm.1;
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        result
    }

    fn apply_ext_gstate(&mut self, resources: Option<&'a Dictionary>, name: &[u8]) {
        let Some(ext) = resource_entry(self.doc, resources, b"ExtGState", name) else {
            return;
        };

        if let Some(width) = ext.get(b"LW").ok().and_then(|o| number(resolve(self.doc, o))) {
            self.state.line_width = width;
        }
        if let Some(alpha) = ext.get(b"CA").ok().and_then(|o| number(resolve(self.doc, o))) {
            self.state.stroke_alpha = alpha;
        }
        if let Some(arr) = ext.get(b"D").ok().and_then(|o| resolve(self.doc, o).as_array().ok()) {
            if let Some(dash) = dash_from_operands(self.doc, arr) {
                self.state.dash = dash;
            }
        }
    }

    fn move_text(&mut self, tx: f64, ty: f64) {
        self.tlm = Matrix::translate(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_text(0.0, -leading);
    }

    fn text_rendering_matrix(&self) -> Matrix {
        let s = &self.state;
        Matrix::new(s.font_size * s.h_scale, 0.0, 0.0, s.font_size, 0.0, s.rise)
            .multiply(&self.tm)
            .multiply(&s.ctm)
    }

    fn show(&mut self, fonts: &HashMap<Vec<u8>, FontInfo>, items: &[ShowItem]) {
        let fallback = FontInfo::default();
        let font = self
            .state
            .font
            .as_ref()
            .and_then(|name| fonts.get(name))
            .unwrap_or(&fallback);

        let start = self.text_rendering_matrix();
        let (fs, th) = (self.state.font_size, self.state.h_scale);
        let mut text = String::new();

        for item in items {
            match item {
                ShowItem::Text(bytes) => {
                    for glyph in font.decode(bytes) {
                        text.push_str(&glyph.text);
                        let spacing = if glyph.is_space {
                            self.state.char_spacing + self.state.word_spacing
                        } else {
                            self.state.char_spacing
                        };
                        let tx = (glyph.width / 1000.0 * fs + spacing) * th;
                        self.tm = Matrix::translate(tx, 0.0).multiply(&self.tm);
                    }
                }
                ShowItem::Adjust(n) => {
                    let tx = -n / 1000.0 * fs * th;
                    // A large positional gap inside TJ separates words.
                    if -n / 1000.0 > JOIN_GAP && !text.is_empty() && !text.ends_with(' ') {
                        text.push(' ');
                    }
                    self.tm = Matrix::translate(tx, 0.0).multiply(&self.tm);
                }
            }
        }

        let end = self.text_rendering_matrix();
        self.push_text(text, &start, &end);
    }

    fn push_text(&mut self, text: String, start: &Matrix, end: &Matrix) {
        if text.trim().is_empty() {
            return;
        }

        let size = start.c.hypot(start.d).abs();
        let (x0, x1) = (start.e.min(end.e), start.e.max(end.e));
        let baseline = start.f;
        let font = self.state.font.clone();

        if let Some(run) = self.run.as_mut() {
            let same_line = run.font == font
                && (run.size - size).abs() < 0.01
                && (run.baseline - baseline).abs() <= 0.01 * size.max(1.0);
            let gap = x0 - run.x1;
            if same_line && gap >= -JOIN_GAP * size && gap <= WORD_GAP * size {
                if gap > JOIN_GAP * size && !run.text.ends_with(' ') && !text.starts_with(' ') {
                    run.text.push(' ');
                }
                run.text.push_str(&text);
                run.x1 = run.x1.max(x1);
                return;
            }
        }

        self.flush_run();
        self.run = Some(TextRun {
            text,
            font,
            size,
            baseline,
            x0,
            x1,
        });
    }

    fn flush_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let top = run.baseline + ASCENT * run.size;
        let bottom = run.baseline - DESCENT * run.size;
        let bbox = Rect::new(
            run.x0 - self.media_box.x0,
            self.media_box.y1 - top,
            run.x1 - self.media_box.x0,
            self.media_box.y1 - bottom,
        );
        trace!("Fragment {:?} at {:?}", run.text, bbox);
        self.fragments.push(TextFragment::new(run.text, bbox, self.page));
    }

    fn device_point(&self, x: f64, y: f64) -> Point {
        let (dx, dy) = self.state.ctm.apply(x, y);
        Point::new(dx, dy)
    }

    fn move_current(&mut self, x: Option<f64>, y: Option<f64>) {
        if let (Some(x), Some(y)) = (x, y) {
            self.current = Some(self.device_point(x, y));
        }
    }

    /// Join the current point back to the start of the subpath.
    fn close_subpath(&mut self) {
        if let (Some(from), Some(start)) = (self.current, self.subpath_start) {
            if from != start {
                self.path.push((from, start));
            }
            self.current = Some(start);
        }
    }

    fn stroke_path(&mut self) {
        let width = self.state.line_width * self.state.ctm.scale();
        for (from, to) in &self.path {
            self.lines.push(LineSegment {
                start: Point::new(from.x - self.media_box.x0, self.media_box.y1 - from.y),
                end: Point::new(to.x - self.media_box.x0, self.media_box.y1 - to.y),
                stroke_opacity: self.state.stroke_alpha,
                color: self.state.stroke_color,
                width,
                dash: self.state.dash.clone(),
            });
        }
    }

    fn clear_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }
}

fn operand(ops: &[Object], index: usize) -> Option<f64> {
    ops.get(index).and_then(number)
}

fn components(ops: &[Object]) -> Vec<f64> {
    ops.iter().filter_map(number).collect()
}

fn color_from_components(values: &[f64]) -> Option<Rgb> {
    match values {
        [g] => Some(Rgb::gray(*g)),
        [r, g, b] => Some(Rgb(*r, *g, *b)),
        [c, m, y, k] => Some(Rgb::from_cmyk(*c, *m, *y, *k)),
        _ => None,
    }
}

/// `[array] phase`, as given to `d` or stored under an ExtGState `/D`.
fn dash_from_operands(doc: &Document, ops: &[Object]) -> Option<DashPattern> {
    let array = resolve(doc, ops.first()?).as_array().ok()?;
    let array: Vec<f64> = array.iter().filter_map(|o| number(resolve(doc, o))).collect();
    let phase = ops.get(1).and_then(|o| number(resolve(doc, o))).unwrap_or(0.0);
    Some(DashPattern::new(array, phase))
}
