use crate::Point;
use crate::geom::segment::is_point_on_segment;

/// Checks if a point lies inside a closed ring of vertices.
///
/// Uses the crossing-number rule: a horizontal ray cast from `ptest` toward +x
/// crosses the boundary an odd number of times iff the point is inside.
/// If `boundary_in` is true, points on the boundary (edges or vertices) are
/// considered inside.
pub fn is_point_inside_polygon(ptest: Point, pts: &[Point], boundary_in: bool) -> bool {
    let n = pts.len();
    if n < 3 {
        return false;
    }

    if is_point_on_boundary(ptest, pts) {
        return boundary_in;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = pts[i];
        let pj = pts[j];
        // Half-open rule on y avoids double counting shared vertices
        if (pi.y > ptest.y) != (pj.y > ptest.y) {
            let x_cross = pj.x + (ptest.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if ptest.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Checks if a point lies on the boundary of the ring (vertices or edges).
pub fn is_point_on_boundary(ptest: Point, pts: &[Point]) -> bool {
    let n = pts.len();
    (0..n).any(|i| is_point_on_segment(ptest, pts[i], pts[(i + 1) % n]))
}
