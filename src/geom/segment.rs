//! Line segment operations on the site plane.

use crate::Point;
use crate::geom::EPS;

/// Finds the closest point on a segment to a given point.
///
/// The segment is defined by two endpoints p1 and p2.
pub fn closest_point_on_segment(pt: Point, p1: Point, p2: Point) -> Point {
    let seg_vec = p2 - p1;
    let seg_len_sq = seg_vec.dot(&seg_vec);

    if seg_len_sq < EPS * EPS {
        // Segment is a point
        return p1;
    }

    let t = ((pt - p1).dot(&seg_vec) / seg_len_sq).clamp(0.0, 1.0);
    p1 + seg_vec * t
}

/// Calculates the distance between a point and a line segment.
///
/// Returns the minimum distance from the point to any point on the segment.
pub fn distance_point_to_segment(pt: Point, p1: Point, p2: Point) -> f64 {
    pt.distance(&closest_point_on_segment(pt, p1, p2))
}

/// Returns true if `pt` lies on the segment p1-p2 (within tolerance).
pub fn is_point_on_segment(pt: Point, p1: Point, p2: Point) -> bool {
    distance_point_to_segment(pt, p1, p2) < EPS
}

/// Checks whether the closed segments p1-p2 and p3-p4 share at least one point.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = (p4 - p3).cross(&(p1 - p3));
    let d2 = (p4 - p3).cross(&(p2 - p3));
    let d3 = (p2 - p1).cross(&(p3 - p1));
    let d4 = (p2 - p1).cross(&(p4 - p1));

    if ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
    {
        return true;
    }

    // Touching or collinear cases
    is_point_on_segment(p1, p3, p4)
        || is_point_on_segment(p2, p3, p4)
        || is_point_on_segment(p3, p1, p2)
        || is_point_on_segment(p4, p1, p2)
}
