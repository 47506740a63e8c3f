use crate::Vector;
use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Point on the local site plane (x = east, y = north, meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0., 0.)
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPS && (self.y - other.y).abs() < EPS
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    /// Scales the point about `center` and returns a copy.
    pub fn scale_about(&self, center: Self, sx: f64, sy: f64) -> Self {
        Self {
            x: center.x + (self.x - center.x) * sx,
            y: center.y + (self.y - center.y) * sy,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(f, "Point({:.prec$}, {:.prec$})", self.x, self.y, prec = prec)
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, other: Vector) -> Self {
        Self {
            x: self.x + other.dx,
            y: self.y + other.dy,
        }
    }
}

/// Difference of two points is the vector from `other` to `self`.
impl Sub for Point {
    type Output = Vector;
    fn sub(self, other: Self) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        let pa = Point::new(5., 5.);
        let pb = Point::new(5.0000000000001, 5.);
        let pc = Point::new(5.0001, 5.);
        assert!(pa.is_close(&pb));
        assert!(!pa.is_close(&pc));
    }

    #[test]
    fn test_scale_about() {
        let p = Point::new(2., 4.);
        let q = p.scale_about(Point::new(1., 1.), 0.5, 2.0);
        assert!(q.is_close(&Point::new(1.5, 7.0)));
    }

    #[test]
    fn test_sub_and_distance() {
        let a = Point::new(1., 1.);
        let b = Point::new(4., 5.);
        let v = b - a;
        assert_eq!(v, Vector::new(3., 4.));
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }
}
