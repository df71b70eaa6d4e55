//! Midpoint displacement: the classic fractal skyline generator. Each
//! generation splits every segment at its midpoint and kicks the midpoint's
//! y by scaled uniform noise; after n generations a straight start segment
//! has become a jagged polyline of 2^n pieces with its endpoints pinned.

use geo_types::{coord, Coord, LineString};
use rand::Rng;

#[derive(Clone, Copy, Debug)]
pub struct Displacer {
    /// How many subdivision generations to run.
    pub iterations: u32,
    /// Multiplier on the raw noise sample.
    pub noise: f64,
    /// Magnitude of the uniform kick: samples come from `-tear..=tear`.
    pub tear: i32,
}

impl Displacer {
    pub fn new(iterations: u32, noise: f64, tear: i32) -> Self {
        Displacer {
            iterations,
            noise,
            tear,
        }
    }

    /// Subdivide the start segment. Zero iterations hand back the segment
    /// as a two-point polyline.
    pub fn displace<R: Rng>(&self, start: geo_types::Line<f64>, rng: &mut R) -> LineString<f64> {
        let mut points: Vec<Coord<f64>> = vec![start.start, start.end];
        for _ in 0..self.iterations {
            let mut next = Vec::with_capacity(points.len() * 2 - 1);
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let kick = self.noise * rng.gen_range(-self.tear..=self.tear) as f64;
                next.push(a);
                next.push(coord! {
                    x: (a.x + b.x) / 2.0,
                    y: (a.y + b.y) / 2.0 + kick,
                });
            }
            if let Some(last) = points.last().copied() {
                next.push(last);
            }
            points = next;
        }
        LineString::new(points)
    }
}

impl Default for Displacer {
    fn default() -> Self {
        Displacer::new(0, 1.0, 25)
    }
}
