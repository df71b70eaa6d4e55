//! Cubic Bezier evaluation on the Bernstein basis matrix, plus the chained
//! mode that strings overlapping four-point windows into one continuous
//! curve.

use geo_types::{coord, Coord, LineString};
use nalgebra::{Matrix4, Vector4};

use crate::errors::EditorError;

/// Default parameter step. Small enough that the polyline is
/// indistinguishable from the curve at screen resolution.
pub const DEFAULT_STEP: f64 = 0.001;

/// The cubic Bernstein basis.
fn basis() -> Matrix4<f64> {
    Matrix4::new(
        -1.0, 3.0, -3.0, 1.0, //
        3.0, -6.0, 3.0, 0.0, //
        -3.0, 3.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, 0.0,
    )
}

/// Sample one cubic Bezier over `t` in `[0, 1)` at the given step,
/// returning the polyline through the samples. The first sample is exactly
/// `p0`.
///
/// # Panics
/// If `step` is not in `(0, 1]`.
pub fn cubic_bezier(
    p0: Coord<f64>,
    p1: Coord<f64>,
    p2: Coord<f64>,
    p3: Coord<f64>,
    step: f64,
) -> LineString<f64> {
    assert!(step > 0.0 && step <= 1.0, "step must be in (0, 1]");
    let b = basis();
    let bx = b * Vector4::new(p0.x, p1.x, p2.x, p3.x);
    let by = b * Vector4::new(p0.y, p1.y, p2.y, p3.y);
    let mut coords = Vec::with_capacity((1.0 / step) as usize + 1);
    let mut i = 0u32;
    loop {
        let t = f64::from(i) * step;
        if t >= 1.0 {
            break;
        }
        let w = Vector4::new(t * t * t, t * t, t, 1.0);
        coords.push(coord! { x: w.dot(&bx), y: w.dot(&by) });
        i += 1;
    }
    LineString::new(coords)
}

fn midpoint(a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    coord! { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 }
}

/// Chain any number (>= 4) of control points into consecutive cubic
/// segments.
///
/// Exactly four points evaluate as one plain cubic. Beyond that, four-point
/// windows advance by two (so consecutive windows overlap in two points);
/// each segment after the first starts at the midpoint of the previous
/// window's last two points, which is what keeps the joined curve
/// continuous. The first segment starts at the true first point, the last
/// ends at the true final point, and an odd tail is closed out through the
/// remaining pair.
pub fn chained_bezier(
    ctrl: &[Coord<f64>],
    step: f64,
) -> Result<Vec<LineString<f64>>, EditorError> {
    let n = ctrl.len();
    if n < 4 {
        return Err(EditorError::NotEnoughShapes {
            what: "curve control points",
            needed: 4,
        });
    }
    if n == 4 {
        return Ok(vec![cubic_bezier(ctrl[0], ctrl[1], ctrl[2], ctrl[3], step)]);
    }
    let mut segments = Vec::new();
    let mut chain = ctrl[0];
    let mut i = 0;
    while i + 3 < n {
        let (p0, p1, p2, p3) = (ctrl[i], ctrl[i + 1], ctrl[i + 2], ctrl[i + 3]);
        let start = if i == 0 { p0 } else { midpoint(p0, p1) };
        let end_mid = midpoint(p2, p3);
        let end = if i + 3 == n - 1 { p3 } else { end_mid };
        segments.push(cubic_bezier(start, p1, p2, end, step));
        chain = end_mid;
        i += 2;
    }
    if n % 2 == 1 {
        // One point past the last full window; finish from the chain point
        // through the final pair so the curve ends on the real last point.
        let a = ctrl[n - 2];
        let b = ctrl[n - 1];
        segments.push(cubic_bezier(chain, a, midpoint(a, b), b, step));
    }
    Ok(segments)
}
