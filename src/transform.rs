//! Builders for 3x3 homogeneous transform matrices about an arbitrary
//! pivot. Each call returns a fresh matrix from its semantic parameters;
//! nothing here composes with or remembers earlier transforms, so applying
//! "rotate 10" twice is two independent 10-degree rotations.

use nalgebra::{Affine2, Matrix3};

use crate::geometry::Point;

/// Rotation by `degrees` about `pivot`: the standard rotation conjugated by
/// the translation that carries the pivot to the origin and back.
pub fn rotation_about(degrees: f64, pivot: &Point) -> Affine2<f64> {
    let phi = degrees.to_radians();
    let (m, n) = (pivot.x as f64, pivot.y as f64);
    Affine2::from_matrix_unchecked(Matrix3::new(
        phi.cos(),
        -phi.sin(),
        -m * phi.cos() + n * phi.sin() + m,
        phi.sin(),
        phi.cos(),
        -m * phi.sin() - n * phi.cos() + n,
        0.0,
        0.0,
        1.0,
    ))
}

/// Scale by `(sx, sy)` holding `pivot` fixed.
pub fn scale_about(sx: f64, sy: f64, pivot: &Point) -> Affine2<f64> {
    let (m, n) = (pivot.x as f64, pivot.y as f64);
    Affine2::from_matrix_unchecked(Matrix3::new(
        sx,
        0.0,
        m - m * sx,
        0.0,
        sy,
        n - n * sy,
        0.0,
        0.0,
        1.0,
    ))
}

/// Shear by `(shx, shy)` degrees with `pivot` as the fixed point. The
/// translation terms cancel the drift a plain origin-shear would give the
/// pivot.
pub fn shear_about(shx_degrees: f64, shy_degrees: f64, pivot: &Point) -> Affine2<f64> {
    let shx = shx_degrees.to_radians().tan();
    let shy = shy_degrees.to_radians().tan();
    let (m, n) = (pivot.x as f64, pivot.y as f64);
    Affine2::from_matrix_unchecked(Matrix3::new(
        1.0,
        shx,
        -n * shx,
        shy,
        1.0,
        -m * shy,
        0.0,
        0.0,
        1.0,
    ))
}

/// Pure translation. No pivot: every point moves the same way.
pub fn translation(tx: f64, ty: f64) -> Affine2<f64> {
    Affine2::from_matrix_unchecked(Matrix3::new(
        1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{shared, Point, Polygon, Shape};

    #[test]
    fn test_translation_is_exact() {
        for (tx, ty) in [(10.0, 5.0), (-3.0, 7.0), (0.0, 0.0), (-120.0, -44.0)] {
            let mut p = Point::new(25, 25);
            p.transform(&translation(tx, ty));
            assert_eq!(p, Point::new(25 + tx as i32, 25 + ty as i32));
        }
    }

    #[test]
    fn test_rotation_fixes_its_own_pivot() {
        for degrees in [0.0, 17.0, 30.0, 45.0, 90.0, 133.7, 180.0, 270.0, 359.0] {
            let mut p = Point::new(100, 60);
            p.transform(&rotation_about(degrees, &Point::new(100, 60)));
            assert_eq!(p, Point::new(100, 60), "pivot drifted at {} degrees", degrees);
        }
    }

    #[test]
    fn test_quarter_turn() {
        let mut p = Point::new(10, 0);
        p.transform(&rotation_about(90.0, &Point::new(0, 0)));
        // y-down screen coordinates: +90 degrees carries +x onto +y.
        assert_eq!(p, Point::new(0, 10));
    }

    #[test]
    fn test_unit_scale_is_identity_on_a_shape() {
        let mut poly = Polygon::new(vec![shared(1, 2), shared(30, 4), shared(17, 25)]);
        let before = poly.ring();
        poly.transform(&scale_about(1.0, 1.0, &Point::new(-40, 95)));
        assert_eq!(poly.ring(), before);
    }

    #[test]
    fn test_scale_about_pivot() {
        let mut p = Point::new(12, 8);
        p.transform(&scale_about(2.0, 3.0, &Point::new(10, 10)));
        assert_eq!(p, Point::new(14, 4));
    }

    #[test]
    fn test_shear_fixes_pivot_row_and_column() {
        // Points sharing the pivot's y keep their y; ditto for x.
        let pivot = Point::new(20, 30);
        let mut p = Point::new(50, 30);
        p.transform(&shear_about(30.0, 0.0, &pivot));
        assert_eq!(p.y, 30);
        let mut q = Point::new(20, 70);
        q.transform(&shear_about(30.0, 0.0, &pivot));
        let shx = 30.0f64.to_radians().tan();
        assert_eq!(q.x, (20.0 + shx * 70.0 - 30.0 * shx).round() as i32);
    }

    #[test]
    fn test_builders_do_not_accumulate() {
        let pivot = Point::new(0, 0);
        let mut p = Point::new(100, 0);
        p.transform(&rotation_about(10.0, &pivot));
        p.transform(&rotation_about(10.0, &pivot));
        let mut q = Point::new(100, 0);
        q.transform(&rotation_about(20.0, &pivot));
        // Two independent 10-degree turns land where one 20-degree turn does
        // (up to the integer grid).
        assert!((p.x - q.x).abs() <= 1 && (p.y - q.y).abs() <= 1);
    }
}
