//! The drawing collaborator the engine expects the host UI to provide.
//!
//! The engine never renders: it hands primitives to a [`Surface`] and lets
//! the host map them onto whatever canvas it owns. Highlights are drawn and
//! then scheduled for removal via [`Surface::clear_after`], so the fade is
//! the host's (non-blocking) problem, not the engine's.

use crate::geometry::Point;

/// Opaque token for something drawn on the surface, so it can be removed
/// later. Hosts pick the representation; the engine only passes it back.
pub type DrawHandle = usize;

pub trait Surface {
    /// Filled oval centered on a point. Returns a handle for later removal.
    fn fill_oval(&mut self, center: Point, radius: i32, color: &str) -> DrawHandle;

    /// Straight segment between two points.
    fn draw_line(&mut self, a: Point, b: Point, color: &str) -> DrawHandle;

    /// Closed outline through a vertex ring.
    fn draw_polygon(&mut self, ring: &[Point], color: &str) -> DrawHandle;

    /// Schedule a drawn item for removal after `delay_ms`. Must not block.
    fn clear_after(&mut self, handle: DrawHandle, delay_ms: u64);
}

/// Everything a [`RecordingSurface`] was asked to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Oval {
        center: Point,
        radius: i32,
        color: String,
    },
    Line {
        a: Point,
        b: Point,
        color: String,
    },
    Polygon {
        ring: Vec<Point>,
        color: String,
    },
    ClearAfter {
        handle: DrawHandle,
        delay_ms: u64,
    },
}

/// A surface that just remembers what it was told. Handy for tests and for
/// headless hosts that want to replay draw calls elsewhere.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ops that are plain draws, skipping the removal bookkeeping.
    pub fn drawn(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| !matches!(op, DrawOp::ClearAfter { .. }))
    }
}

impl Surface for RecordingSurface {
    fn fill_oval(&mut self, center: Point, radius: i32, color: &str) -> DrawHandle {
        self.ops.push(DrawOp::Oval {
            center,
            radius,
            color: color.to_string(),
        });
        self.ops.len() - 1
    }

    fn draw_line(&mut self, a: Point, b: Point, color: &str) -> DrawHandle {
        self.ops.push(DrawOp::Line {
            a,
            b,
            color: color.to_string(),
        });
        self.ops.len() - 1
    }

    fn draw_polygon(&mut self, ring: &[Point], color: &str) -> DrawHandle {
        self.ops.push(DrawOp::Polygon {
            ring: ring.to_vec(),
            color: color.to_string(),
        });
        self.ops.len() - 1
    }

    fn clear_after(&mut self, handle: DrawHandle, delay_ms: u64) {
        self.ops.push(DrawOp::ClearAfter { handle, delay_ms });
    }
}
