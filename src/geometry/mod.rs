//! The shape model: integer-coordinate points, segments over shared
//! vertices, and polygons with a derived edge ring.
//!
//! Vertices are shared between shapes through [`SharedPoint`] handles, so a
//! line built on two existing points follows those points wherever a later
//! transform drags them. A copy-based model would silently desynchronize
//! shared edges.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{Affine2, Point2};

use crate::surface::Surface;

/// Radius used when drawing a point as a filled oval.
pub const POINT_RADIUS: i32 = 5;

/// How long a highlight overlay lingers before the host clears it, in ms.
pub const HIGHLIGHT_MS: u64 = 200;

/// A vertex on the canvas. Screen coordinates, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A session-owned vertex that lines and polygons reference rather than
/// copy. Interior mutability is what lets one transform move every shape
/// built on the vertex at once.
pub type SharedPoint = Rc<RefCell<Point>>;

/// Wrap fresh coordinates into a [`SharedPoint`].
pub fn shared(x: i32, y: i32) -> SharedPoint {
    Rc::new(RefCell::new(Point::new(x, y)))
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// True iff self lies in the axis-aligned rectangle spanned by two
    /// corner points, in either corner order.
    pub fn in_rect(&self, p1: &Point, p2: &Point) -> bool {
        let minx = p1.x.min(p2.x);
        let maxx = p1.x.max(p2.x);
        let miny = p1.y.min(p2.y);
        let maxy = p1.y.max(p2.y);
        minx <= self.x && self.x <= maxx && miny <= self.y && self.y <= maxy
    }

    /// Apply a homogeneous transform in place, rounding back to the integer
    /// grid. Rounding (rather than truncating) keeps a transform whose fixed
    /// point is this very vertex from nudging it off by one.
    pub fn transform(&mut self, matrix: &Affine2<f64>) {
        let p = matrix * Point2::new(self.x as f64, self.y as f64);
        self.x = p.x.round() as i32;
        self.y = p.y.round() as i32;
    }

    /// Click hit-test: within `radius` of `other`, Euclidean.
    pub fn near(&self, other: &Point, radius: i32) -> bool {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy <= (radius as i64) * (radius as i64)
    }
}

/// A segment over two shared endpoints.
#[derive(Clone, Debug)]
pub struct Line {
    pub p1: SharedPoint,
    pub p2: SharedPoint,
}

impl Line {
    pub fn new(p1: SharedPoint, p2: SharedPoint) -> Self {
        Line { p1, p2 }
    }

    /// A line over fresh, unshared endpoints. For intermediate results
    /// (ray probes, curve output) that must not disturb session vertices.
    pub fn owned(a: Point, b: Point) -> Self {
        Line::new(Rc::new(RefCell::new(a)), Rc::new(RefCell::new(b)))
    }

    /// Copies of both endpoints, for arithmetic without holding borrows.
    pub fn endpoints(&self) -> (Point, Point) {
        (*self.p1.borrow(), *self.p2.borrow())
    }

    /// Midpoint, integer division.
    pub fn center(&self) -> Point {
        let (a, b) = self.endpoints();
        Point::new((a.x + b.x) / 2, (a.y + b.y) / 2)
    }

    /// The x coordinate where the segment's infinite line crosses height
    /// `y`. Vertical segments answer their constant x for any height.
    /// Horizontal segments have no single answer, so `None` rather than a
    /// division by zero.
    pub fn x_at(&self, y: i32) -> Option<i32> {
        let (a, b) = self.endpoints();
        if a.x == b.x {
            return Some(a.x);
        }
        if a.y == b.y {
            return None;
        }
        let x = (y - a.y) as f64 * (b.x - a.x) as f64 / (b.y - a.y) as f64 + a.x as f64;
        Some(x as i32)
    }
}

/// A closed ring of at least three shared vertices, plus the derived edges
/// connecting consecutive vertices (closing edge included). Edges reference
/// the very same vertex handles as the ring, so `lines[i]` always connects
/// `points[i]` to `points[(i+1) % n]`, transforms included.
#[derive(Clone, Debug)]
pub struct Polygon {
    points: Vec<SharedPoint>,
    lines: Vec<Line>,
}

impl Polygon {
    /// Build a polygon over an ordered vertex ring.
    ///
    /// # Panics
    /// If the ring has fewer than three vertices.
    pub fn new(points: Vec<SharedPoint>) -> Self {
        assert!(points.len() >= 3, "polygon needs at least three vertices");
        let n = points.len();
        let lines = (0..n)
            .map(|i| Line::new(points[i].clone(), points[(i + 1) % n].clone()))
            .collect();
        Polygon { points, lines }
    }

    pub fn points(&self) -> &[SharedPoint] {
        &self.points
    }

    pub fn edges(&self) -> &[Line] {
        &self.lines
    }

    /// The ring as plain coordinates, for hosts that draw outlines.
    pub fn ring(&self) -> Vec<Point> {
        self.points.iter().map(|p| *p.borrow()).collect()
    }
}

/// What every editable shape can do. The session dispatches selection,
/// drawing, and transforms through this interface instead of branching on
/// the concrete kind.
pub trait Shape {
    fn draw(&self, surface: &mut dyn Surface);
    fn highlight(&self, surface: &mut dyn Surface, timeout_ms: u64);
    fn in_rect(&self, p1: &Point, p2: &Point) -> bool;
    fn transform(&mut self, matrix: &Affine2<f64>);
    fn center(&self) -> Point;
}

impl Shape for Point {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_oval(*self, POINT_RADIUS, "black");
    }

    fn highlight(&self, surface: &mut dyn Surface, timeout_ms: u64) {
        let handle = surface.fill_oval(*self, POINT_RADIUS, "red");
        surface.clear_after(handle, timeout_ms);
    }

    fn in_rect(&self, p1: &Point, p2: &Point) -> bool {
        Point::in_rect(self, p1, p2)
    }

    fn transform(&mut self, matrix: &Affine2<f64>) {
        Point::transform(self, matrix)
    }

    fn center(&self) -> Point {
        *self
    }
}

impl Shape for Line {
    fn draw(&self, surface: &mut dyn Surface) {
        let (a, b) = self.endpoints();
        surface.draw_line(a, b, "black");
    }

    fn highlight(&self, surface: &mut dyn Surface, timeout_ms: u64) {
        let (a, b) = self.endpoints();
        let handle = surface.draw_line(a, b, "red");
        surface.clear_after(handle, timeout_ms);
    }

    /// Both endpoints inside: a coarse containment test, not clipping. A
    /// segment crossing the rectangle with both endpoints outside does NOT
    /// count, and selection semantics depend on that staying true.
    fn in_rect(&self, p1: &Point, p2: &Point) -> bool {
        let (a, b) = self.endpoints();
        a.in_rect(p1, p2) && b.in_rect(p1, p2)
    }

    fn transform(&mut self, matrix: &Affine2<f64>) {
        self.p1.borrow_mut().transform(matrix);
        // A degenerate line may share a single vertex; move it once.
        if !Rc::ptr_eq(&self.p1, &self.p2) {
            self.p2.borrow_mut().transform(matrix);
        }
    }

    fn center(&self) -> Point {
        Line::center(self)
    }
}

impl Shape for Polygon {
    fn draw(&self, surface: &mut dyn Surface) {
        for line in &self.lines {
            line.draw(surface);
        }
    }

    fn highlight(&self, surface: &mut dyn Surface, timeout_ms: u64) {
        let handle = surface.draw_polygon(&self.ring(), "red");
        surface.clear_after(handle, timeout_ms);
    }

    fn in_rect(&self, p1: &Point, p2: &Point) -> bool {
        self.lines.iter().all(|line| line.in_rect(p1, p2))
    }

    /// One pass over the vertex ring; the edge list shares the ring's
    /// handles, so every vertex moves exactly once.
    fn transform(&mut self, matrix: &Affine2<f64>) {
        for point in &self.points {
            point.borrow_mut().transform(matrix);
        }
    }

    fn center(&self) -> Point {
        let n = self.points.len() as i64;
        let (sx, sy) = self.points.iter().fold((0i64, 0i64), |(sx, sy), p| {
            let p = p.borrow();
            (sx + p.x as i64, sy + p.y as i64)
        });
        Point::new((sx / n) as i32, (sy / n) as i32)
    }
}
