//! Geometric queries over the shape model: half-plane classification,
//! point-in-polygon by two strategies, segment intersection, and the
//! perpendicular-edge trick.
//!
//! The two containment strategies are deliberately separate. The signed-area
//! walk is only correct for convex rings; ray casting handles anything but
//! costs an intersection test per edge. Do not merge them.

use crate::geometry::{Line, Point, Polygon};
use crate::transform::rotation_about;

/// Which half-plane of a directed line a point falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Signed area of the triangle spanned by directed edge `(o, a)` and query
/// point `b`. Positive means `b` is left of the edge under the y-down
/// screen convention.
pub fn signed_area(o: &Point, a: &Point, b: &Point) -> i64 {
    (o.y - b.y) as i64 * (a.x - o.x) as i64 - (b.x - o.x) as i64 * (o.y - a.y) as i64
}

/// Classify a point against the directed line `p1 -> p2`. Points exactly on
/// the line count as `Right`.
pub fn side_of(line: &Line, p: &Point) -> Side {
    let (o, a) = line.endpoints();
    if signed_area(&o, &a, p) > 0 {
        Side::Left
    } else {
        Side::Right
    }
}

/// Point-in-polygon for convex rings: inside iff no edge sees the point on
/// its outside half-plane. Bails on the first violating edge. Garbage in,
/// garbage out for non-convex rings; use [`contains_raycast`] there.
pub fn contains_convex(poly: &Polygon, p: &Point) -> bool {
    poly.edges().iter().all(|edge| {
        let (o, a) = edge.endpoints();
        signed_area(&o, &a, p) <= 0
    })
}

/// Result of a ray-cast containment test: the verdict plus which edges the
/// ray crossed, so the host can flash them as a diagnostic.
#[derive(Clone, Debug)]
pub struct RayCast {
    pub inside: bool,
    pub crossed: Vec<usize>,
}

/// Point-in-polygon by ray casting: a horizontal probe from the query point
/// to the right canvas edge, counting edge crossings. Odd count means
/// interior. Works for any simple polygon, convex or not.
pub fn contains_raycast(poly: &Polygon, p: &Point, canvas_width: i32) -> RayCast {
    let ray = Line::owned(*p, Point::new(canvas_width, p.y));
    let crossed: Vec<usize> = poly
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, edge)| segment_intersection(edge, &ray).is_some())
        .map(|(i, _)| i)
        .collect();
    RayCast {
        inside: crossed.len() % 2 == 1,
        crossed,
    }
}

/// Intersection point of two segments, or `None` when they are parallel,
/// collinear, or meet only beyond an endpoint.
///
/// Solves for the parameter along the first segment with the determinant
/// formula; a zero denominator (parallel or collinear, overlap included) is
/// reported as no intersection rather than divided by. The infinite-line
/// solution is then accepted only if it falls inside both segments'
/// bounding boxes.
pub fn segment_intersection(l1: &Line, l2: &Line) -> Option<Point> {
    let (a, b) = l1.endpoints();
    let (c, d) = l2.endpoints();
    let denom = (a.x - b.x) as i64 * (c.y - d.y) as i64 - (a.y - b.y) as i64 * (c.x - d.x) as i64;
    if denom == 0 {
        return None;
    }
    let numer = (a.x - c.x) as i64 * (c.y - d.y) as i64 - (a.y - c.y) as i64 * (c.x - d.x) as i64;
    let t = numer as f64 / denom as f64;
    let x = a.x as f64 + t * (b.x - a.x) as f64;
    let y = a.y as f64 + t * (b.y - a.y) as f64;
    if in_box(x, y, &a, &b) && in_box(x, y, &c, &d) {
        Some(Point::new(x.round() as i32, y.round() as i32))
    } else {
        None
    }
}

fn in_box(x: f64, y: f64, a: &Point, b: &Point) -> bool {
    let (lox, hix) = (a.x.min(b.x) as f64, a.x.max(b.x) as f64);
    let (loy, hiy) = (a.y.min(b.y) as f64, a.y.max(b.y) as f64);
    lox <= x && x <= hix && loy <= y && y <= hiy
}

/// Rotate both endpoints of a segment 90 degrees about the segment's own
/// center, in place. Each half (endpoint to center) swings a quarter turn,
/// so the segment becomes its own perpendicular through the same midpoint.
/// Shapes sharing the endpoints follow along.
pub fn rotate_edge_90(line: &Line) {
    let center = line.center();
    let matrix = rotation_about(90.0, &center);
    line.p1.borrow_mut().transform(&matrix);
    if !std::rc::Rc::ptr_eq(&line.p1, &line.p2) {
        line.p2.borrow_mut().transform(&matrix);
    }
}
