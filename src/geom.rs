pub mod bboxes;
pub mod point;
pub mod polygon;
pub mod segment;
pub mod vector;

/// Geometric precision (site coordinates are in meters)
pub(crate) const EPS: f64 = 1e-9;
