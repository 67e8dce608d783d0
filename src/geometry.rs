//! Floating-point geometry for meter shapes.
//!
//! Shapes are built in view pixel coordinates (y grows downward) and handed
//! to the backend as a [`Path`]: a set of closed polygon contours filled with
//! the even-odd rule, plus optional text cutouts.
//!
//! # Boolean Subtraction
//!
//! The meter only ever subtracts shapes that lie inside the shape they are cut
//! from (a bolt or percentage digits inside the battery body). Under the
//! even-odd rule, appending such a contour *is* the difference, so no general
//! polygon clipper is needed. Text cannot be expressed as polygons here, so it
//! is kept as a [`TextRun`] cutout the backend masks out while filling.
//!
//! # Rectangle Intersection
//!
//! Intersecting with an axis-aligned rectangle clips every contour on its own
//! (Sutherland-Hodgman). Points inside the rectangle keep their crossing
//! parity, so even-odd semantics survive the clip.

use heapless::Vec;

use crate::commands::TextRun;

/// Maximum vertices per contour (after clipping).
pub const MAX_POLYGON_POINTS: usize = 32;

/// Maximum contours per path (outline + one cutout, with headroom).
pub const MAX_CONTOURS: usize = 4;

/// Maximum text cutouts per path.
pub const MAX_TEXT_CUTOUTS: usize = 1;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(
        x: f32,
        y: f32,
    ) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, `left/top` inclusive.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
    ) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub fn width(&self) -> f32 { self.right - self.left }

    #[inline]
    pub fn height(&self) -> f32 { self.bottom - self.top }

    #[inline]
    pub fn center_x(&self) -> f32 { (self.left + self.right) * 0.5 }

    #[inline]
    pub fn center_y(&self) -> f32 { (self.top + self.bottom) * 0.5 }

    #[inline]
    pub fn is_empty(&self) -> bool { self.left >= self.right || self.top >= self.bottom }

    /// Move so the top-left corner sits at `(x, y)`, keeping the size.
    pub fn offset_to(
        &self,
        x: f32,
        y: f32,
    ) -> Self {
        Self::new(x, y, x + self.width(), y + self.height())
    }

    /// Copy with a different top edge.
    pub const fn with_top(
        &self,
        top: f32,
    ) -> Self {
        Self::new(self.left, top, self.right, self.bottom)
    }
}

/// Closed polygon; the last point connects back to the first.
pub type Polygon = Vec<PointF, MAX_POLYGON_POINTS>;

/// Even-odd filled path with optional text cutouts.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    contours: Vec<Polygon, MAX_CONTOURS>,
    text_cutouts: Vec<TextRun, MAX_TEXT_CUTOUTS>,
}

impl Path {
    pub const fn new() -> Self {
        Self {
            contours: Vec::new(),
            text_cutouts: Vec::new(),
        }
    }

    /// Path with a single contour.
    pub fn from_polygon(polygon: Polygon) -> Self {
        let mut path = Self::new();
        path.add_contour(polygon);
        path
    }

    /// Append a contour. Returns `false` if the path is full.
    pub fn add_contour(
        &mut self,
        polygon: Polygon,
    ) -> bool {
        self.contours.push(polygon).is_ok()
    }

    /// Cut `polygon` out of this path. The polygon must lie inside the
    /// existing fill for the even-odd result to equal the difference.
    pub fn subtract_polygon(
        &mut self,
        polygon: Polygon,
    ) -> bool {
        self.add_contour(polygon)
    }

    /// Cut rendered text out of this path.
    pub fn subtract_text(
        &mut self,
        text: TextRun,
    ) -> bool {
        self.text_cutouts.push(text).is_ok()
    }

    #[inline]
    pub fn contours(&self) -> &[Polygon] { &self.contours }

    #[inline]
    pub fn text_cutouts(&self) -> &[TextRun] { &self.text_cutouts }

    /// True when no contour can cover any area.
    pub fn is_empty(&self) -> bool { self.contours.iter().all(|c| c.len() < 3) }

    /// Intersection with an axis-aligned rectangle.
    pub fn intersect_rect(
        &self,
        rect: &RectF,
    ) -> Self {
        let mut out = Self::new();
        if rect.is_empty() {
            return out;
        }
        for contour in &self.contours {
            let clipped = clip_polygon(contour, rect);
            if clipped.len() >= 3 {
                out.add_contour(clipped);
            }
        }
        if !out.contours.is_empty() {
            out.text_cutouts = self.text_cutouts.clone();
        }
        out
    }

    /// Even-odd containment test against the polygon contours.
    ///
    /// Text cutouts are not considered; the backend masks those separately.
    pub fn contains(
        &self,
        point: PointF,
    ) -> bool {
        let mut inside = false;
        for contour in &self.contours {
            if polygon_contains(contour, point) {
                inside = !inside;
            }
        }
        inside
    }

    /// Bounding box of all contours.
    pub fn bounds(&self) -> Option<RectF> {
        let mut points = self.contours.iter().flat_map(|c| c.iter());
        let first = points.next()?;
        let init = RectF::new(first.x, first.y, first.x, first.y);
        Some(points.fold(init, |r, p| {
            RectF::new(r.left.min(p.x), r.top.min(p.y), r.right.max(p.x), r.bottom.max(p.y))
        }))
    }
}

/// Build a polygon from points, failing if it exceeds capacity.
pub fn polygon_from(points: &[PointF]) -> Option<Polygon> { Vec::from_slice(points).ok() }

/// Polygon tracing the four corners of a rectangle.
pub fn rect_polygon(rect: &RectF) -> Polygon {
    let mut polygon = Polygon::new();
    for point in [
        PointF::new(rect.left, rect.top),
        PointF::new(rect.right, rect.top),
        PointF::new(rect.right, rect.bottom),
        PointF::new(rect.left, rect.bottom),
    ] {
        polygon.push(point).ok();
    }
    polygon
}

/// Crossing-number test, sampling the half-open edge convention.
fn polygon_contains(
    polygon: &[PointF],
    point: PointF,
) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[derive(Clone, Copy)]
enum Edge {
    Left(f32),
    Top(f32),
    Right(f32),
    Bottom(f32),
}

impl Edge {
    fn inside(
        self,
        p: PointF,
    ) -> bool {
        match self {
            Self::Left(x) => p.x >= x,
            Self::Top(y) => p.y >= y,
            Self::Right(x) => p.x <= x,
            Self::Bottom(y) => p.y <= y,
        }
    }

    fn intersect(
        self,
        a: PointF,
        b: PointF,
    ) -> PointF {
        match self {
            Self::Left(x) | Self::Right(x) => {
                let t = (x - a.x) / (b.x - a.x);
                PointF::new(x, a.y + t * (b.y - a.y))
            }
            Self::Top(y) | Self::Bottom(y) => {
                let t = (y - a.y) / (b.y - a.y);
                PointF::new(a.x + t * (b.x - a.x), y)
            }
        }
    }
}

/// Sutherland-Hodgman clip of one polygon against a rectangle.
fn clip_polygon(
    polygon: &[PointF],
    rect: &RectF,
) -> Polygon {
    let mut current: Polygon = Vec::from_slice(polygon).unwrap_or_default();
    for edge in [
        Edge::Left(rect.left),
        Edge::Top(rect.top),
        Edge::Right(rect.right),
        Edge::Bottom(rect.bottom),
    ] {
        if current.is_empty() {
            break;
        }
        let input = core::mem::take(&mut current);
        let mut prev = input[input.len() - 1];
        for &point in &input {
            match (edge.inside(point), edge.inside(prev)) {
                (true, true) => {
                    current.push(point).ok();
                }
                (true, false) => {
                    current.push(edge.intersect(prev, point)).ok();
                    current.push(point).ok();
                }
                (false, true) => {
                    current.push(edge.intersect(prev, point)).ok();
                }
                (false, false) => {}
            }
            prev = point;
        }
    }
    current
}
