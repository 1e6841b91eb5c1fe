//! Page geometry primitives in top-left-origin coordinates.
//!
//! All coordinates are PDF points with y increasing downward, which is the
//! space the layout stages reason in.

use serde::{Deserialize, Serialize};

/// A point on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle (x0, y0) top-left to (x1, y1) bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Get the width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Get the height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Check if a point is inside this rectangle (inclusive bounds).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// The transaction table area of one page.
///
/// Only built by [`crate::layout::region::resolve_region`], which guarantees
/// `x0 < x1` and `y0 < y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region(pub(crate) Rect);

impl Region {
    pub fn top(&self) -> f64 {
        self.0.y0
    }

    pub fn bottom(&self) -> f64 {
        self.0.y1
    }

    pub fn left(&self) -> f64 {
        self.0.x0
    }

    pub fn right(&self) -> f64 {
        self.0.x1
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.0.contains_point(x, y)
    }

    /// Whether `x` lies within the horizontal extent of the region.
    pub fn spans_x(&self, x: f64) -> bool {
        x >= self.0.x0 && x <= self.0.x1
    }

    /// Whether `y` lies within the vertical extent of the region.
    pub fn spans_y(&self, y: f64) -> bool {
        y >= self.0.y0 && y <= self.0.y1
    }
}

/// A run of rendered text with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Text content.
    pub text: String,
    /// Bounding box.
    pub bbox: Rect,
    /// Page number (1-indexed).
    pub page: u32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, bbox: Rect, page: u32) -> Self {
        Self {
            text: text.into(),
            bbox,
            page,
        }
    }
}

/// RGB color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

    pub fn gray(g: f64) -> Self {
        Rgb(g, g, g)
    }

    pub fn from_cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        Rgb(
            (1.0 - c) * (1.0 - k),
            (1.0 - m) * (1.0 - k),
            (1.0 - y) * (1.0 - k),
        )
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Rgb, tolerance: f64) -> bool {
        (self.0 - other.0).abs() <= tolerance
            && (self.1 - other.1).abs() <= tolerance
            && (self.2 - other.2).abs() <= tolerance
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Stroke dash pattern: `[array] phase`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashPattern {
    pub array: Vec<f64>,
    pub phase: f64,
}

impl DashPattern {
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn new(array: Vec<f64>, phase: f64) -> Self {
        Self { array, phase }
    }

    /// A pattern with no dash lengths (or only zeros) draws a solid line.
    pub fn is_solid(&self) -> bool {
        self.array.iter().all(|d| *d == 0.0)
    }
}

impl std::fmt::Display for DashPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.array.iter().map(|d| format!("{}", d)).collect();
        write!(f, "[{}] {}", parts.join(" "), self.phase)
    }
}

/// A straight stroked segment with its drawing style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    /// Stroke alpha (1.0 = opaque).
    pub stroke_opacity: f64,
    /// Stroke color.
    pub color: Rgb,
    /// Line width in page units.
    pub width: f64,
    /// Dash pattern in effect when the segment was stroked.
    pub dash: DashPattern,
}

impl LineSegment {
    /// Solid, opaque, black, 1pt segment. Mostly useful for building test pages.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stroke_opacity: 1.0,
            color: Rgb::BLACK,
            width: 1.0,
            dash: DashPattern::solid(),
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = opacity;
        self
    }

    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    /// Horizontal extent of the segment.
    pub fn length_x(&self) -> f64 {
        (self.end.x - self.start.x).abs()
    }
}
