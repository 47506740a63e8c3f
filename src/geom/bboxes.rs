use crate::geom::EPS;
use crate::geom::point::Point;

/// Returns the (min, max) corners of the axis-aligned box holding all `pts`.
///
/// An empty slice yields an inverted box (min = +inf, max = -inf).
pub fn bounding_box(pts: &[Point]) -> (Point, Point) {
    let mut pmin = Point::new(f64::INFINITY, f64::INFINITY);
    let mut pmax = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in pts {
        pmin.x = pmin.x.min(p.x);
        pmin.y = pmin.y.min(p.y);
        pmax.x = pmax.x.max(p.x);
        pmax.y = pmax.y.max(p.y);
    }
    (pmin, pmax)
}

/// Checks whether a point is inside (or on) the box given by its corners.
pub fn is_point_inside_bbox(ptest: Point, pmin: Point, pmax: Point) -> bool {
    ptest.x >= pmin.x - EPS
        && ptest.x <= pmax.x + EPS
        && ptest.y >= pmin.y - EPS
        && ptest.y <= pmax.y + EPS
}
