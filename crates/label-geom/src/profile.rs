use serde::{Deserialize, Serialize};

use crate::geometry::Point2d;

/// A 2D path builder producing one closed contour.
///
/// Mirrors the move/line/quadratic vocabulary the plate and wedge outlines
/// are drawn with; quadratic segments are flattened at build time.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    points: Vec<Point2d>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.points.push(Point2d::new(x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.points.push(Point2d::new(x, y));
    }

    /// Quadratic Bezier from the current point through control `(cx, cy)` to
    /// `(x, y)`, flattened into `segments` line segments.
    pub fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64, segments: usize) {
        let start = match self.points.last() {
            Some(p) => *p,
            None => {
                self.points.push(Point2d::new(x, y));
                return;
            }
        };
        let control = Point2d::new(cx, cy);
        let end = Point2d::new(x, y);
        let segments = segments.max(1);
        for i in 1..=segments {
            let t = i as f64 / segments as f64;
            let a = start.lerp(&control, t);
            let b = control.lerp(&end, t);
            self.points.push(a.lerp(&b, t));
        }
    }

    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    /// Consume the profile as a closed ring, dropping an explicit closing
    /// point that duplicates the start.
    pub fn into_ring(mut self) -> Vec<Point2d> {
        if self.points.len() > 1 {
            let first = self.points[0];
            let last = self.points[self.points.len() - 1];
            if first.distance_to(&last) < 1e-9 {
                self.points.pop();
            }
        }
        self.points
    }
}

/// A closed region: one exterior ring plus zero or more hole rings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Point2d>,
    pub holes: Vec<Vec<Point2d>>,
}

impl Polygon {
    pub fn from_exterior(exterior: Vec<Point2d>) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }
}

/// Signed area of a ring; positive for counter-clockwise winding.
pub fn signed_area(ring: &[Point2d]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Even-odd ray-cast point containment.
pub fn ring_contains(ring: &[Point2d], p: Point2d) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
