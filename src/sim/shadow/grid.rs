use crate::error::{Error, Result};
use crate::massing::BuildingMassing;
use crate::Point;

/// Upper bound on grid nodes scanned for one run.
const MAX_GRID_NODES: i64 = 4_000_000;

/// A candidate sample location on the measurement plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub position: Point,
    /// Distance to the ground floor footprint edges [m].
    pub distance: f64,
}

/// Generates the sample grid around the massing.
///
/// Nodes sit on multiples of `cell_size` so the grid does not shift with the
/// footprint. Nodes inside (or on) any floor footprint and nodes farther than
/// `radius` from the building are discarded. Points are ordered row by row,
/// south to north and west to east.
pub fn sample_grid(massing: &BuildingMassing, cell_size: f64, radius: f64) -> Result<Vec<GridPoint>> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(Error::Input(format!(
            "grid cell size must be positive, got {cell_size}"
        )));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::Input(format!(
            "grid radius must be non-negative, got {radius}"
        )));
    }

    let base = massing.base_footprint();
    let (min, max) = base.bbox();

    // Counted in f64 first: huge footprints would overflow the integer math
    let i0 = ((min.x - radius) / cell_size).ceil();
    let i1 = ((max.x + radius) / cell_size).floor();
    let j0 = ((min.y - radius) / cell_size).ceil();
    let j1 = ((max.y + radius) / cell_size).floor();
    let nodes = (i1 - i0 + 1.0).max(0.0) * (j1 - j0 + 1.0).max(0.0);
    if !nodes.is_finite() || nodes > MAX_GRID_NODES as f64 {
        return Err(Error::Input(format!(
            "sample grid too dense: {nodes:.0} nodes (cell {cell_size} m, radius {radius} m)"
        )));
    }
    let (i0, i1, j0, j1) = (i0 as i64, i1 as i64, j0 as i64, j1 as i64);

    let mut points = Vec::new();
    for j in j0..=j1 {
        for i in i0..=i1 {
            let position = Point::new(i as f64 * cell_size, j as f64 * cell_size);
            if massing.covers(position) {
                continue;
            }
            let distance = base.distance_to_boundary(position);
            if distance <= radius {
                points.push(GridPoint { position, distance });
            }
        }
    }

    Ok(points)
}
