use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::geom::EPS;
use crate::geom::bboxes::bounding_box;
use crate::geom::segment::distance_point_to_segment;
use crate::{Point, Vector};

pub mod containment;

/// Simple planar polygon stored as an ordered ring of vertices.
///
/// The ring is implicitly closed (the last vertex connects to the first) and
/// always wound counter-clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    pts: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    ///
    /// A trailing vertex equal to the first one is dropped. Clockwise rings are
    /// reversed. Fails if fewer than 3 vertices remain or the area is zero.
    pub fn new(mut pts: Vec<Point>) -> Result<Self> {
        if pts.len() > 1 && pts[0].is_close(&pts[pts.len() - 1]) {
            pts.pop();
        }
        if pts.len() < 3 {
            return Err(Error::DegenerateGeometry(format!(
                "polygon needs at least 3 vertices, got {}",
                pts.len()
            )));
        }
        if pts.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::DegenerateGeometry(
                "polygon has non-finite coordinates".to_string(),
            ));
        }
        let area = signed_area(&pts);
        if area.abs() < EPS {
            return Err(Error::DegenerateGeometry("polygon has zero area".to_string()));
        }
        if area < 0.0 {
            pts.reverse();
        }
        Ok(Self { pts })
    }

    /// Axis-aligned rectangle centered at `center`.
    pub fn rectangle(center: Point, width: f64, depth: f64) -> Result<Self> {
        let (hw, hd) = (width / 2.0, depth / 2.0);
        Self::new(vec![
            Point::new(center.x - hw, center.y - hd),
            Point::new(center.x + hw, center.y - hd),
            Point::new(center.x + hw, center.y + hd),
            Point::new(center.x - hw, center.y + hd),
        ])
    }

    pub fn vertices(&self) -> &[Point] {
        &self.pts
    }

    /// Iterates over the edges of the closed ring.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.pts.len();
        (0..n).map(move |i| (self.pts[i], self.pts[(i + 1) % n]))
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.pts).abs()
    }

    /// Area-weighted centroid.
    pub fn centroid(&self) -> Point {
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (a, b) in self.edges() {
            let w = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * w;
            cy += (a.y + b.y) * w;
        }
        let f = 6.0 * signed_area(&self.pts);
        Point::new(cx / f, cy / f)
    }

    /// Returns the (min, max) corners of the bounding box.
    pub fn bbox(&self) -> (Point, Point) {
        bounding_box(&self.pts)
    }

    /// Returns a copy moved by `v`.
    pub fn translate(&self, v: Vector) -> Self {
        Self {
            pts: self.pts.iter().map(|&p| p + v).collect(),
        }
    }

    /// Returns a copy scaled about `center` by independent x/y factors.
    ///
    /// Factors must be positive so the winding order is preserved.
    pub fn scale_about(&self, center: Point, sx: f64, sy: f64) -> Result<Self> {
        if sx <= 0.0 || sy <= 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "scale factors must be positive, got ({sx}, {sy})"
            )));
        }
        Ok(Self {
            pts: self.pts.iter().map(|p| p.scale_about(center, sx, sy)).collect(),
        })
    }

    /// Checks if a point lies inside the polygon.
    ///
    /// If `boundary_in` is true, points on the boundary count as inside.
    pub fn is_point_inside(&self, ptest: Point, boundary_in: bool) -> bool {
        containment::is_point_inside_polygon(ptest, &self.pts, boundary_in)
    }

    /// Shortest distance from `ptest` to any edge of the ring.
    pub fn distance_to_boundary(&self, ptest: Point) -> f64 {
        self.edges()
            .map(|(a, b)| distance_point_to_segment(ptest, a, b))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Shoelace formula; positive for counter-clockwise rings.
fn signed_area(pts: &[Point]) -> f64 {
    let n = pts.len();
    let mut s = 0.0;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        s += a.x * b.y - b.x * a.y;
    }
    0.5 * s
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = Error;
    fn try_from(pts: Vec<Point>) -> Result<Self> {
        Self::new(pts)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(poly: Polygon) -> Self {
        poly.pts
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2);
        write!(f, "Polygon(")?;
        for (i, p) in self.pts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.prec$}", p, prec = prec)?;
        }
        write!(f, ")")
    }
}
