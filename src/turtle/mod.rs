//! Logo-style turtle graphics: the replay half of the fractal generators.
//! An expanded grammar string walks the turtle around the plane; the
//! strokes come back as `geo_types` polylines for the host to draw.

use geo::prelude::BoundingRect;
use geo_types::{LineString, MultiLineString, Point, Polygon, Rect};
use rand::Rng;

use crate::l_system::LSystem;

/// Helper function to convert degrees to radians.
pub fn degrees(deg: f64) -> f64 {
    std::f64::consts::PI * (deg / 180.0)
}

/// How much one `@` atom shrinks the stride and pen width.
const SHRINK: f64 = 0.8;

/// Everything a bracket push must be able to restore. Strokes drawn since
/// the push are kept; only the pose comes back.
#[derive(Clone, Copy, Debug)]
struct Pose {
    position: Point<f64>,
    heading: f64,
    stride: f64,
    pen_width: f64,
}

#[derive(Clone)]
pub struct Turtle {
    stack: Vec<Pose>,
    lines: Vec<Vec<Point<f64>>>,
    position: Point<f64>,
    start: Option<Point<f64>>,
    heading: f64,
    stride: f64,
    pen_width: f64,
    pen: bool,
}

/// Chainable turtle actions plus grammar replay.
///
/// # Example
///
/// ```
/// use geo_types::MultiLineString;
/// use shapelab_rs::turtle::{degrees, Turtle, TurtleTrait};
/// let square: MultiLineString<f64> = Turtle::new()
///     .pen_down()
///     .fwd(100.0)
///     .right(degrees(90.0))
///     .fwd(100.0)
///     .right(degrees(90.0))
///     .fwd(100.0)
///     .right(degrees(90.0))
///     .fwd(100.0)
///     .to_multiline();
/// ```
pub trait TurtleTrait {
    fn new() -> Turtle;
    fn fwd(self, distance: f64) -> Self;
    fn left(self, angle: f64) -> Self;
    fn right(self, angle: f64) -> Self;
    fn pen_up(self) -> Self;
    fn pen_down(self) -> Self;
    fn close(self) -> Self;
    fn push(self) -> Self;
    fn pop(self) -> Self;
    fn stride(self, stride: f64) -> Self;
    fn walk_grammar<R: Rng>(self, path: &str, system: &LSystem, rng: &mut R) -> Self;
    fn to_multiline(&self) -> MultiLineString<f64>;
    fn to_polygon(&self) -> Result<Polygon<f64>, geo_types::Error>;
    fn bounds(&self) -> Option<Rect<f64>>;
    fn pen_width(&self) -> f64;
}

impl TurtleTrait for Turtle {
    fn new() -> Self {
        Turtle {
            stack: vec![],
            lines: vec![],
            position: Point::new(0.0f64, 0.0f64),
            start: None,
            heading: 0.0,
            stride: 10.0,
            pen_width: 4.0,
            pen: false,
        }
    }

    fn fwd(mut self, distance: f64) -> Self {
        let pos = self.position
            + Point::new(
                distance * self.heading.cos(),
                distance * self.heading.sin(),
            );
        if self.pen {
            if let Some(line) = self.lines.last_mut() {
                line.push(pos);
            }
        }
        self.position = pos;
        self
    }

    fn left(mut self, angle: f64) -> Self {
        self.heading += angle;
        self
    }

    fn right(mut self, angle: f64) -> Self {
        self.heading -= angle;
        self
    }

    fn pen_up(mut self) -> Self {
        self.pen = false;
        self.start = None;
        self
    }

    fn pen_down(mut self) -> Self {
        if self.pen {
            self
        } else {
            self.pen = true;
            self.start = Some(self.position);
            self.lines.push(vec![self.position]);
            self
        }
    }

    /// Return to where the pen last went down, drawing the closing stroke
    /// if the pen is still down.
    fn close(mut self) -> Self {
        match self.start {
            Some(start) => {
                if self.pen {
                    if let Some(line) = self.lines.last_mut() {
                        line.push(start);
                    }
                }
                self.position = start;
                self
            }
            None => self,
        }
    }

    fn push(mut self) -> Self {
        self.stack.push(Pose {
            position: self.position,
            heading: self.heading,
            stride: self.stride,
            pen_width: self.pen_width,
        });
        self
    }

    /// Restore the last pushed pose. The jump back happens pen-up: a fresh
    /// stroke starts at the restored position, and everything drawn since
    /// the push stays drawn.
    fn pop(mut self) -> Self {
        if let Some(pose) = self.stack.pop() {
            self.position = pose.position;
            self.heading = pose.heading;
            self.stride = pose.stride;
            self.pen_width = pose.pen_width;
            if self.pen {
                self.lines.push(vec![self.position]);
            }
        }
        self
    }

    fn stride(mut self, stride: f64) -> Self {
        self.stride = stride;
        self
    }

    /// Replay an expanded grammar string: alphabet letters step forward by
    /// the current stride, `+`/`-` turn left/right by the system's angle
    /// (sampled fresh on every turn when ranged), `[`/`]` push and pop the
    /// pose, `@` shrinks stride and pen width. Anything else is a silent
    /// marker letter.
    fn walk_grammar<R: Rng>(mut self, path: &str, system: &LSystem, rng: &mut R) -> Self {
        for c in path.chars() {
            self = match c {
                '+' => {
                    let angle = system.angle.sample(rng);
                    self.left(degrees(angle))
                }
                '-' => {
                    let angle = system.angle.sample(rng);
                    self.right(degrees(angle))
                }
                '[' => self.push(),
                ']' => self.pop(),
                '@' => {
                    self.stride *= SHRINK;
                    self.pen_width *= SHRINK;
                    self
                }
                c if system.alphabet.contains(&c) => {
                    let stride = self.stride;
                    self.fwd(stride)
                }
                _ => self,
            }
        }
        self
    }

    /// All strokes with at least two points, as one multiline.
    fn to_multiline(&self) -> MultiLineString<f64> {
        self.lines
            .iter()
            .filter(|line| line.len() >= 2)
            .map(|line| LineString::from(line.clone()))
            .collect()
    }

    fn to_polygon(&self) -> Result<Polygon<f64>, geo_types::Error> {
        let mut strokes = self.lines.iter().filter(|line| line.len() >= 2);
        match (strokes.next(), strokes.next()) {
            (Some(stroke), None) => Ok(Polygon::new(LineString::from(stroke.clone()), vec![])),
            _ => Err(geo_types::Error::MismatchedGeometry {
                expected: "Single linestring",
                found: "Multiple or zero linestrings",
            }),
        }
    }

    /// Bounding rectangle over every stroke, so a host can fit its view.
    fn bounds(&self) -> Option<Rect<f64>> {
        self.to_multiline().bounding_rect()
    }

    fn pen_width(&self) -> f64 {
        self.pen_width
    }
}
