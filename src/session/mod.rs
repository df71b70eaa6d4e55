//! The editing session: a mode-driven state machine the host UI feeds with
//! clicks, drags, and prompt text. It owns every shape, tracks one selected
//! shape and one mark point, and dispatches transforms and queries against
//! them.
//!
//! Everything here is synchronous and single-threaded; a failed action
//! returns an error and leaves the session exactly as it was, because each
//! action re-derives its result from current state rather than from any
//! accumulated history.

use std::fmt;
use std::rc::Rc;

use geo_types::{coord, Coord, LineString};
use nalgebra::Affine2;

use crate::curve::{chained_bezier, DEFAULT_STEP};
use crate::errors::EditorError;
use crate::geometry::{shared, Line, Point, Polygon, Shape, SharedPoint, HIGHLIGHT_MS};
use crate::query::{
    contains_convex, contains_raycast, rotate_edge_90, segment_intersection, side_of, Side,
};
use crate::surface::Surface;
use crate::transform::{rotation_about, scale_about, shear_about, translation};

/// How close a click must land to an existing vertex to grab it.
pub const HIT_RADIUS: i32 = 5;

const MARK_HIGHLIGHT_MS: u64 = 500;
const CROSSING_HIGHLIGHT_MS: u64 = 1000;
const INTERSECT_HIGHLIGHT_MS: u64 = 500;

/// Which input handler is live. Mode gates clicks and drags, never queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    PointDraw,
    LineDraw,
    PolygonDraw,
    SelectShape,
    Rotate,
    Scale,
    Shear,
    Translate,
    ApplySpecial,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::PointDraw => "PointDraw",
            Mode::LineDraw => "LineDraw",
            Mode::PolygonDraw => "PolygonDraw",
            Mode::SelectShape => "SelectShape",
            Mode::Rotate => "Rotate",
            Mode::Scale => "Scale",
            Mode::Shear => "Shear",
            Mode::Translate => "Translate",
            Mode::ApplySpecial => "ApplySpecial",
        };
        write!(f, "{}", name)
    }
}

/// The shape kind rectangle-selection is currently looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Point,
    Line,
    Polygon,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Line => "line",
            ShapeKind::Polygon => "polygon",
        }
    }

    fn next(self) -> Self {
        match self {
            ShapeKind::Point => ShapeKind::Line,
            ShapeKind::Line => ShapeKind::Polygon,
            ShapeKind::Polygon => ShapeKind::Point,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Point => "Point",
            ShapeKind::Line => "Line",
            ShapeKind::Polygon => "Polygon",
        };
        write!(f, "{}", name)
    }
}

/// Identity of a selected shape: kind plus index into the owning
/// collection. Ownership never moves; the session keeps the shape, the
/// selection only names it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeRef {
    Point(usize),
    Line(usize),
    Polygon(usize),
}

impl ShapeRef {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRef::Point(_) => ShapeKind::Point,
            ShapeRef::Line(_) => ShapeKind::Line,
            ShapeRef::Polygon(_) => ShapeKind::Polygon,
        }
    }
}

/// The four one-shot transforms a host prompt can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformKind {
    Rotate,
    Scale,
    Shear,
    Translate,
}

impl TransformKind {
    fn mode(self) -> Mode {
        match self {
            TransformKind::Rotate => Mode::Rotate,
            TransformKind::Scale => Mode::Scale,
            TransformKind::Shear => Mode::Shear,
            TransformKind::Translate => Mode::Translate,
        }
    }
}

/// The special functions reachable from the host's function list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    ConvexContainment,
    RayCastContainment,
    ClassifyPoint,
    RotateEdge90,
    EdgeIntersect,
    BezierCurve,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::ConvexContainment => "Point in convex polygon",
            QueryKind::RayCastContainment => "Point in any polygon",
            QueryKind::ClassifyPoint => "Classify point position",
            QueryKind::RotateEdge90 => "Rotate edge 90 degrees",
            QueryKind::EdgeIntersect => "Edge intersection",
            QueryKind::BezierCurve => "Bezier curve",
        };
        write!(f, "{}", name)
    }
}

/// What a query hands back for the host to present or draw.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryOutcome {
    Containment(bool),
    Side(Side),
    Intersection(Option<Point>),
    EdgeRotated,
    Curve(Vec<LineString<f64>>),
}

/// The editing session itself. One per canvas.
pub struct Session {
    width: i32,
    height: i32,
    mode: Mode,
    filter: ShapeKind,
    points: Vec<SharedPoint>,
    lines: Vec<Line>,
    polygons: Vec<Polygon>,
    line_buffer: Vec<SharedPoint>,
    polygon_buffer: Vec<SharedPoint>,
    selected: Option<ShapeRef>,
    mark: Option<Point>,
    drag_from: Option<Point>,
    drag_to: Option<Point>,
}

impl Session {
    pub fn new(width: i32, height: i32) -> Self {
        Session {
            width,
            height,
            mode: Mode::PointDraw,
            filter: ShapeKind::Line,
            points: vec![],
            lines: vec![],
            polygons: vec![],
            line_buffer: vec![],
            polygon_buffer: vec![],
            selected: None,
            mark: None,
            drag_from: None,
            drag_to: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn shape_filter(&self) -> ShapeKind {
        self.filter
    }

    /// Cycle the selection filter Point -> Line -> Polygon. Only listens
    /// while the select tool is active.
    pub fn cycle_shape_filter(&mut self) {
        if self.mode == Mode::SelectShape {
            self.filter = self.filter.next();
        }
    }

    pub fn points(&self) -> &[SharedPoint] {
        &self.points
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn selected(&self) -> Option<ShapeRef> {
        self.selected
    }

    pub fn mark(&self) -> Option<Point> {
        self.mark
    }

    /// Place the mark point (alternate pivot and query probe).
    pub fn set_mark(&mut self, x: i32, y: i32, surface: &mut dyn Surface) {
        let mark = Point::new(x, y);
        mark.highlight(surface, MARK_HIGHLIGHT_MS);
        self.mark = Some(mark);
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    /// Drop any half-built line or polygon.
    pub fn clear_buffers(&mut self) {
        self.line_buffer.clear();
        self.polygon_buffer.clear();
    }

    /// Back to an empty canvas: collections, buffers, selection, mark and
    /// mode all return to their starting state.
    pub fn reset(&mut self) {
        self.mode = Mode::PointDraw;
        self.points.clear();
        self.lines.clear();
        self.polygons.clear();
        self.line_buffer.clear();
        self.polygon_buffer.clear();
        self.selected = None;
        self.mark = None;
        self.drag_from = None;
        self.drag_to = None;
    }

    /// Redraw every owned shape onto the surface.
    pub fn draw_all(&self, surface: &mut dyn Surface) {
        for point in &self.points {
            point.borrow().draw(surface);
        }
        for line in &self.lines {
            line.draw(surface);
        }
        for polygon in &self.polygons {
            polygon.draw(surface);
        }
    }

    /// A primary click, routed by the current mode.
    pub fn handle_click(&mut self, x: i32, y: i32, surface: &mut dyn Surface) {
        match self.mode {
            Mode::PointDraw => {
                let point = shared(x, y);
                point.borrow().draw(surface);
                self.points.push(point);
            }
            Mode::LineDraw => {
                let click = Point::new(x, y);
                if let Some(hit) = self.hit_point(&click) {
                    hit.borrow().highlight(surface, HIGHLIGHT_MS);
                    self.line_buffer.push(hit);
                }
                if self.line_buffer.len() == 2 {
                    let line = Line::new(self.line_buffer[0].clone(), self.line_buffer[1].clone());
                    line.draw(surface);
                    self.lines.push(line);
                    self.line_buffer.clear();
                }
            }
            Mode::PolygonDraw => {
                let click = Point::new(x, y);
                let Some(hit) = self.hit_point(&click) else {
                    return;
                };
                let closes = self
                    .polygon_buffer
                    .first()
                    .map(|first| Rc::ptr_eq(first, &hit))
                    .unwrap_or(false);
                if closes {
                    // Ring closure; anything under a triangle stays buffered.
                    if self.polygon_buffer.len() >= 3 {
                        let polygon = Polygon::new(std::mem::take(&mut self.polygon_buffer));
                        polygon.draw(surface);
                        self.polygons.push(polygon);
                    }
                } else if !self.polygon_buffer.iter().any(|p| Rc::ptr_eq(p, &hit)) {
                    hit.borrow().highlight(surface, HIGHLIGHT_MS);
                    self.polygon_buffer.push(hit);
                }
            }
            _ => {}
        }
    }

    fn hit_point(&self, click: &Point) -> Option<SharedPoint> {
        self.points
            .iter()
            .find(|p| p.borrow().near(click, HIT_RADIUS))
            .cloned()
    }

    /// Begin a selection drag. Ignored outside select mode.
    pub fn handle_drag_start(&mut self, x: i32, y: i32) {
        if self.mode == Mode::SelectShape {
            self.drag_from = Some(Point::new(x, y));
            self.drag_to = None;
        }
    }

    pub fn handle_drag_move(&mut self, x: i32, y: i32) {
        if self.mode == Mode::SelectShape && self.drag_from.is_some() {
            self.drag_to = Some(Point::new(x, y));
        }
    }

    /// The rubber-band rectangle mid-drag, for the host to render.
    pub fn selection_rect(&self) -> Option<(Point, Point)> {
        match (self.drag_from, self.drag_to) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// Finish a selection drag: the first shape of the filtered kind fully
    /// inside the rectangle becomes the selection. No hit leaves any prior
    /// selection in place.
    pub fn handle_drag_end(&mut self, surface: &mut dyn Surface) {
        if self.mode != Mode::SelectShape {
            return;
        }
        if let (Some(a), Some(b)) = (self.drag_from, self.drag_to) {
            let found = match self.filter {
                ShapeKind::Point => self
                    .points
                    .iter()
                    .position(|p| p.borrow().in_rect(&a, &b))
                    .map(ShapeRef::Point),
                ShapeKind::Line => self
                    .lines
                    .iter()
                    .position(|l| l.in_rect(&a, &b))
                    .map(ShapeRef::Line),
                ShapeKind::Polygon => self
                    .polygons
                    .iter()
                    .position(|p| Shape::in_rect(p, &a, &b))
                    .map(ShapeRef::Polygon),
            };
            if let Some(shape) = found {
                self.with_shape(shape, |s| s.highlight(surface, HIGHLIGHT_MS));
                self.selected = Some(shape);
            }
        }
        self.drag_from = None;
        self.drag_to = None;
    }

    /// Remove the selected shape from its owning collection. Shared
    /// vertices referenced by other shapes live on through their handles.
    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        let selected = self.selected.take().ok_or(EditorError::NoSelection)?;
        match selected {
            ShapeRef::Point(i) => {
                self.points.remove(i);
            }
            ShapeRef::Line(i) => {
                self.lines.remove(i);
            }
            ShapeRef::Polygon(i) => {
                self.polygons.remove(i);
            }
        }
        Ok(())
    }

    /// Parse the prompt text, build a one-shot matrix about the pivot (mark
    /// point if set, else the shape's own center) and apply it to the
    /// selected shape. Entering the tool switches the mode even when the
    /// action itself then fails.
    pub fn apply_transform(&mut self, kind: TransformKind, input: &str) -> Result<(), EditorError> {
        self.mode = kind.mode();
        let selected = self.selected.ok_or(EditorError::NoSelection)?;
        let matrix = self.build_matrix(kind, input, selected)?;
        self.with_shape_mut(selected, |s| s.transform(&matrix));
        Ok(())
    }

    fn build_matrix(
        &self,
        kind: TransformKind,
        input: &str,
        selected: ShapeRef,
    ) -> Result<Affine2<f64>, EditorError> {
        let pivot = self
            .mark
            .unwrap_or_else(|| self.with_shape(selected, |s| s.center()));
        match kind {
            TransformKind::Rotate => Ok(rotation_about(parse_float(input)?, &pivot)),
            TransformKind::Scale => {
                let (sx, sy) = parse_pair(input)?;
                Ok(scale_about(sx, sy, &pivot))
            }
            TransformKind::Shear => {
                let (shx, shy) = parse_pair(input)?;
                Ok(shear_about(shx, shy, &pivot))
            }
            TransformKind::Translate => {
                let (tx, ty) = parse_pair(input)?;
                Ok(translation(tx, ty))
            }
        }
    }

    /// Run one of the special functions against current session state.
    /// Successful dispatch drops the mode back to PointDraw; a failed one
    /// touches nothing.
    pub fn apply_query(
        &mut self,
        kind: QueryKind,
        surface: &mut dyn Surface,
    ) -> Result<QueryOutcome, EditorError> {
        let outcome = match kind {
            QueryKind::ConvexContainment => {
                let mark = self.require_mark()?;
                let polygon = self.selected_polygon()?;
                QueryOutcome::Containment(contains_convex(polygon, &mark))
            }
            QueryKind::RayCastContainment => {
                let mark = self.require_mark()?;
                let polygon = self.selected_polygon()?;
                let hit = contains_raycast(polygon, &mark, self.width);
                for &i in &hit.crossed {
                    polygon.edges()[i].highlight(surface, CROSSING_HIGHLIGHT_MS);
                }
                QueryOutcome::Containment(hit.inside)
            }
            QueryKind::ClassifyPoint => {
                let mark = self.require_mark()?;
                let line = self.selected_line()?;
                QueryOutcome::Side(side_of(line, &mark))
            }
            QueryKind::RotateEdge90 => {
                let line = self.lines.last().ok_or(EditorError::NotEnoughShapes {
                    what: "lines",
                    needed: 1,
                })?;
                rotate_edge_90(line);
                QueryOutcome::EdgeRotated
            }
            QueryKind::EdgeIntersect => {
                if self.lines.len() < 2 {
                    return Err(EditorError::NotEnoughShapes {
                        what: "lines",
                        needed: 2,
                    });
                }
                let newest = &self.lines[self.lines.len() - 1];
                let previous = &self.lines[self.lines.len() - 2];
                newest.highlight(surface, INTERSECT_HIGHLIGHT_MS);
                previous.highlight(surface, INTERSECT_HIGHLIGHT_MS);
                QueryOutcome::Intersection(segment_intersection(newest, previous))
            }
            QueryKind::BezierCurve => {
                let ctrl: Vec<Coord<f64>> = self
                    .points
                    .iter()
                    .map(|p| {
                        let p = p.borrow();
                        coord! { x: p.x as f64, y: p.y as f64 }
                    })
                    .collect();
                QueryOutcome::Curve(chained_bezier(&ctrl, DEFAULT_STEP)?)
            }
        };
        self.mode = Mode::PointDraw;
        Ok(outcome)
    }

    fn require_mark(&self) -> Result<Point, EditorError> {
        self.mark.ok_or(EditorError::NoMarkPoint)
    }

    fn selected_polygon(&self) -> Result<&Polygon, EditorError> {
        match self.selected.ok_or(EditorError::NoSelection)? {
            ShapeRef::Polygon(i) => Ok(&self.polygons[i]),
            other => Err(EditorError::WrongShape {
                expected: "polygon",
                found: other.kind().name(),
            }),
        }
    }

    fn selected_line(&self) -> Result<&Line, EditorError> {
        match self.selected.ok_or(EditorError::NoSelection)? {
            ShapeRef::Line(i) => Ok(&self.lines[i]),
            other => Err(EditorError::WrongShape {
                expected: "line",
                found: other.kind().name(),
            }),
        }
    }

    /// The session's one dispatch point over shape kinds: everything that
    /// works on "the shape behind this reference" funnels through here.
    fn with_shape<R>(&self, shape: ShapeRef, f: impl FnOnce(&dyn Shape) -> R) -> R {
        match shape {
            ShapeRef::Point(i) => f(&*self.points[i].borrow()),
            ShapeRef::Line(i) => f(&self.lines[i]),
            ShapeRef::Polygon(i) => f(&self.polygons[i]),
        }
    }

    fn with_shape_mut<R>(&mut self, shape: ShapeRef, f: impl FnOnce(&mut dyn Shape) -> R) -> R {
        match shape {
            ShapeRef::Point(i) => f(&mut *self.points[i].borrow_mut()),
            ShapeRef::Line(i) => f(&mut self.lines[i]),
            ShapeRef::Polygon(i) => f(&mut self.polygons[i]),
        }
    }
}

fn parse_float(input: &str) -> Result<f64, EditorError> {
    input
        .trim()
        .parse()
        .map_err(|_| EditorError::ParseInput(input.to_string()))
}

fn parse_pair(input: &str) -> Result<(f64, f64), EditorError> {
    let (a, b) = input
        .split_once(',')
        .ok_or_else(|| EditorError::ParseInput(input.to_string()))?;
    Ok((parse_float(a)?, parse_float(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn session() -> (Session, RecordingSurface) {
        (Session::new(1000, 600), RecordingSurface::new())
    }

    /// Click out a line between two drawn points.
    fn draw_line(s: &mut Session, sf: &mut RecordingSurface, a: (i32, i32), b: (i32, i32)) {
        s.set_mode(Mode::PointDraw);
        s.handle_click(a.0, a.1, sf);
        s.handle_click(b.0, b.1, sf);
        s.set_mode(Mode::LineDraw);
        s.handle_click(a.0, a.1, sf);
        s.handle_click(b.0, b.1, sf);
    }

    fn select_rect(s: &mut Session, sf: &mut RecordingSurface, from: (i32, i32), to: (i32, i32)) {
        s.set_mode(Mode::SelectShape);
        s.handle_drag_start(from.0, from.1);
        s.handle_drag_move(to.0, to.1);
        s.handle_drag_end(sf);
    }

    #[test]
    fn test_point_draw_appends() {
        let (mut s, mut sf) = session();
        s.handle_click(10, 20, &mut sf);
        s.handle_click(30, 40, &mut sf);
        assert_eq!(s.points().len(), 2);
        assert_eq!(*s.points()[1].borrow(), Point::new(30, 40));
    }

    #[test]
    fn test_line_draw_shares_vertices() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (10, 10), (100, 10));
        assert_eq!(s.lines().len(), 1);
        assert!(s.line_buffer.is_empty());
        assert!(Rc::ptr_eq(&s.lines()[0].p1, &s.points()[0]));
    }

    #[test]
    fn test_line_draw_ignores_empty_canvas_clicks() {
        let (mut s, mut sf) = session();
        s.set_mode(Mode::LineDraw);
        s.handle_click(10, 10, &mut sf);
        assert!(s.line_buffer.is_empty());
        assert!(s.lines().is_empty());
    }

    #[test]
    fn test_polygon_ring_closure() {
        let (mut s, mut sf) = session();
        for &(x, y) in &[(100, 100), (200, 100), (150, 200)] {
            s.handle_click(x, y, &mut sf);
        }
        s.set_mode(Mode::PolygonDraw);
        for &(x, y) in &[(100, 100), (200, 100), (150, 200)] {
            s.handle_click(x, y, &mut sf);
        }
        assert!(s.polygons().is_empty());
        // Clicking the first vertex again closes the ring.
        s.handle_click(101, 99, &mut sf);
        assert_eq!(s.polygons().len(), 1);
        assert!(s.polygon_buffer.is_empty());
        assert!(Rc::ptr_eq(&s.polygons()[0].points()[0], &s.points()[0]));
    }

    #[test]
    fn test_polygon_refuses_degenerate_ring() {
        let (mut s, mut sf) = session();
        s.handle_click(100, 100, &mut sf);
        s.handle_click(200, 100, &mut sf);
        s.set_mode(Mode::PolygonDraw);
        s.handle_click(100, 100, &mut sf);
        s.handle_click(200, 100, &mut sf);
        s.handle_click(100, 100, &mut sf);
        // Two buffered vertices cannot close into a polygon.
        assert!(s.polygons().is_empty());
        assert_eq!(s.polygon_buffer.len(), 2);
    }

    #[test]
    fn test_rect_selection_picks_first_contained_line() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (10, 10), (50, 50));
        draw_line(&mut s, &mut sf, (300, 300), (400, 400));
        select_rect(&mut s, &mut sf, (0, 0), (60, 60));
        assert_eq!(s.selected(), Some(ShapeRef::Line(0)));
        assert!(s.selection_rect().is_none());
    }

    #[test]
    fn test_selection_respects_filter() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (10, 10), (50, 50));
        s.set_mode(Mode::SelectShape);
        s.cycle_shape_filter(); // Line -> Polygon
        assert_eq!(s.shape_filter(), ShapeKind::Polygon);
        select_rect(&mut s, &mut sf, (0, 0), (60, 60));
        // Only a polygon would match, and there is none.
        assert_eq!(s.selected(), None);
        s.set_mode(Mode::SelectShape);
        s.cycle_shape_filter(); // Polygon -> Point
        select_rect(&mut s, &mut sf, (0, 0), (20, 20));
        assert_eq!(s.selected(), Some(ShapeRef::Point(0)));
    }

    #[test]
    fn test_translate_selected_point() {
        let (mut s, mut sf) = session();
        s.handle_click(100, 100, &mut sf);
        s.set_mode(Mode::SelectShape);
        s.cycle_shape_filter(); // Line -> Polygon
        s.cycle_shape_filter(); // Polygon -> Point
        select_rect(&mut s, &mut sf, (90, 90), (110, 110));
        assert_eq!(s.selected(), Some(ShapeRef::Point(0)));
        s.apply_transform(TransformKind::Translate, "10,5").unwrap();
        assert_eq!(*s.points()[0].borrow(), Point::new(110, 105));
        assert_eq!(s.mode(), Mode::Translate);
    }

    #[test]
    fn test_transform_without_selection() {
        let (mut s, _) = session();
        assert_eq!(
            s.apply_transform(TransformKind::Rotate, "45"),
            Err(EditorError::NoSelection)
        );
    }

    #[test]
    fn test_malformed_prompt_leaves_state_alone() {
        let (mut s, mut sf) = session();
        s.handle_click(100, 100, &mut sf);
        s.set_mode(Mode::SelectShape);
        s.cycle_shape_filter();
        s.cycle_shape_filter(); // Line -> Polygon -> Point
        select_rect(&mut s, &mut sf, (90, 90), (110, 110));
        let err = s.apply_transform(TransformKind::Scale, "2;3").unwrap_err();
        assert!(matches!(err, EditorError::ParseInput(_)));
        assert_eq!(*s.points()[0].borrow(), Point::new(100, 100));
    }

    #[test]
    fn test_mark_point_becomes_the_pivot() {
        let (mut s, mut sf) = session();
        s.handle_click(100, 100, &mut sf);
        s.set_mode(Mode::SelectShape);
        s.cycle_shape_filter();
        s.cycle_shape_filter();
        select_rect(&mut s, &mut sf, (90, 90), (110, 110));
        s.set_mark(0, 0, &mut sf);
        s.apply_transform(TransformKind::Scale, "2,2").unwrap();
        // Scaled about the mark, not the point's own center.
        assert_eq!(*s.points()[0].borrow(), Point::new(200, 200));
    }

    #[test]
    fn test_shared_vertex_edit_propagates() {
        let (mut s, mut sf) = session();
        // Two lines sharing the middle vertex.
        s.handle_click(100, 100, &mut sf);
        s.handle_click(200, 100, &mut sf);
        s.handle_click(300, 100, &mut sf);
        s.set_mode(Mode::LineDraw);
        s.handle_click(100, 100, &mut sf);
        s.handle_click(200, 100, &mut sf);
        s.handle_click(200, 100, &mut sf);
        s.handle_click(300, 100, &mut sf);
        assert_eq!(s.lines().len(), 2);
        select_rect(&mut s, &mut sf, (90, 90), (210, 110));
        assert_eq!(s.selected(), Some(ShapeRef::Line(0)));
        s.apply_transform(TransformKind::Translate, "0,50").unwrap();
        // The second line's first endpoint is the shared vertex and moved.
        let (a, _) = s.lines()[1].endpoints();
        assert_eq!(a, Point::new(200, 150));
    }

    #[test]
    fn test_delete_selected() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (10, 10), (50, 50));
        select_rect(&mut s, &mut sf, (0, 0), (60, 60));
        s.delete_selected().unwrap();
        assert!(s.lines().is_empty());
        assert_eq!(s.selected(), None);
        assert_eq!(s.delete_selected(), Err(EditorError::NoSelection));
        assert_eq!(
            s.apply_transform(TransformKind::Translate, "1,1"),
            Err(EditorError::NoSelection)
        );
    }

    #[test]
    fn test_convex_query_happy_path() {
        let (mut s, mut sf) = session();
        for &(x, y) in &[(100, 100), (200, 100), (200, 200), (100, 200)] {
            s.handle_click(x, y, &mut sf);
        }
        s.set_mode(Mode::PolygonDraw);
        for &(x, y) in &[(100, 100), (200, 100), (200, 200), (100, 200), (100, 100)] {
            s.handle_click(x, y, &mut sf);
        }
        assert_eq!(s.polygons().len(), 1);
        s.set_mode(Mode::SelectShape);
        s.cycle_shape_filter(); // Line -> Polygon
        select_rect(&mut s, &mut sf, (90, 90), (210, 210));
        assert_eq!(s.selected(), Some(ShapeRef::Polygon(0)));
        s.set_mark(150, 150, &mut sf);
        match s.apply_query(QueryKind::ConvexContainment, &mut sf).unwrap() {
            QueryOutcome::Containment(inside) => assert!(inside),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(s.mode(), Mode::PointDraw);
    }

    #[test]
    fn test_raycast_query_highlights_crossed_edges() {
        let (mut s, mut sf) = session();
        for &(x, y) in &[(100, 100), (200, 100), (200, 200), (100, 200)] {
            s.handle_click(x, y, &mut sf);
        }
        s.set_mode(Mode::PolygonDraw);
        for &(x, y) in &[(100, 100), (200, 100), (200, 200), (100, 200), (100, 100)] {
            s.handle_click(x, y, &mut sf);
        }
        s.set_mode(Mode::SelectShape);
        s.cycle_shape_filter(); // Line -> Polygon
        select_rect(&mut s, &mut sf, (90, 90), (210, 210));
        s.set_mark(150, 150, &mut sf);
        let drawn_before = sf.ops.len();
        match s.apply_query(QueryKind::RayCastContainment, &mut sf).unwrap() {
            QueryOutcome::Containment(inside) => assert!(inside),
            other => panic!("unexpected outcome {:?}", other),
        }
        // One crossed edge flashed: a draw plus its scheduled removal.
        assert_eq!(sf.ops.len(), drawn_before + 2);
    }

    #[test]
    fn test_query_wrong_shape_kind() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (10, 10), (50, 50));
        select_rect(&mut s, &mut sf, (0, 0), (60, 60));
        s.set_mark(20, 20, &mut sf);
        let err = s
            .apply_query(QueryKind::ConvexContainment, &mut sf)
            .unwrap_err();
        assert_eq!(
            err,
            EditorError::WrongShape {
                expected: "polygon",
                found: "line"
            }
        );
    }

    #[test]
    fn test_query_needs_mark_point() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (10, 10), (50, 50));
        select_rect(&mut s, &mut sf, (0, 0), (60, 60));
        assert_eq!(
            s.apply_query(QueryKind::ClassifyPoint, &mut sf),
            Err(EditorError::NoMarkPoint)
        );
    }

    #[test]
    fn test_edge_intersect_query() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (100, 100), (200, 200));
        draw_line(&mut s, &mut sf, (100, 200), (200, 100));
        match s.apply_query(QueryKind::EdgeIntersect, &mut sf).unwrap() {
            QueryOutcome::Intersection(p) => assert_eq!(p, Some(Point::new(150, 150))),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_edge_intersect_needs_two_lines() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (100, 100), (200, 200));
        assert_eq!(
            s.apply_query(QueryKind::EdgeIntersect, &mut sf),
            Err(EditorError::NotEnoughShapes {
                what: "lines",
                needed: 2
            })
        );
    }

    #[test]
    fn test_rotate_edge_90_spins_the_newest_line() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (100, 100), (200, 100));
        s.apply_query(QueryKind::RotateEdge90, &mut sf).unwrap();
        let (a, b) = s.lines()[0].endpoints();
        assert_eq!(a.x, b.x);
        assert_eq!(s.lines()[0].center(), Point::new(150, 100));
    }

    #[test]
    fn test_bezier_query_needs_four_points() {
        let (mut s, mut sf) = session();
        s.handle_click(10, 10, &mut sf);
        s.handle_click(20, 20, &mut sf);
        assert!(matches!(
            s.apply_query(QueryKind::BezierCurve, &mut sf),
            Err(EditorError::NotEnoughShapes { needed: 4, .. })
        ));
        // The failed dispatch left the mode alone.
        assert_eq!(s.mode(), Mode::PointDraw);
    }

    #[test]
    fn test_bezier_query_over_session_points() {
        let (mut s, mut sf) = session();
        for &(x, y) in &[(0, 0), (100, 200), (200, 0), (300, 200)] {
            s.handle_click(x, y, &mut sf);
        }
        match s.apply_query(QueryKind::BezierCurve, &mut sf).unwrap() {
            QueryOutcome::Curve(segments) => {
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].0[0], coord! { x: 0.0, y: 0.0 });
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_classify_point_side() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (100, 100), (200, 100));
        select_rect(&mut s, &mut sf, (90, 90), (210, 110));
        s.set_mark(150, 90, &mut sf);
        assert_eq!(
            s.apply_query(QueryKind::ClassifyPoint, &mut sf),
            Ok(QueryOutcome::Side(Side::Left))
        );
        s.set_mark(150, 110, &mut sf);
        assert_eq!(
            s.apply_query(QueryKind::ClassifyPoint, &mut sf),
            Ok(QueryOutcome::Side(Side::Right))
        );
        s.clear_mark();
        assert_eq!(s.mark(), None);
    }

    #[test]
    fn test_clear_buffers_drops_partial_shapes() {
        let (mut s, mut sf) = session();
        s.handle_click(10, 10, &mut sf);
        s.handle_click(60, 60, &mut sf);
        s.set_mode(Mode::LineDraw);
        s.handle_click(10, 10, &mut sf);
        s.clear_buffers();
        s.handle_click(60, 60, &mut sf);
        // The first buffered endpoint was dropped, so no line committed.
        assert!(s.lines().is_empty());
        assert_eq!(s.line_buffer.len(), 1);
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let (mut s, mut sf) = session();
        draw_line(&mut s, &mut sf, (10, 10), (50, 50));
        s.set_mark(5, 5, &mut sf);
        select_rect(&mut s, &mut sf, (0, 0), (60, 60));
        s.reset();
        assert!(s.points().is_empty() && s.lines().is_empty() && s.polygons().is_empty());
        assert_eq!(s.selected(), None);
        assert_eq!(s.mark(), None);
        assert_eq!(s.mode(), Mode::PointDraw);
    }
}
