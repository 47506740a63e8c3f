//! Procedural building massing.
//!
//! A massing is the gross volumetric approximation of the building: a stack
//! of floor plates with their footprints, optional setback, balconies and the
//! foundation slab. It is derived from [`BuildingParameters`] and never
//! mutated afterwards; any parameter change means generating a new one.

use serde::{Deserialize, Serialize};

use crate::{Point, Polygon};

pub mod config;
pub mod generator;
pub mod params;
pub mod shape;

pub use config::MassingConfig;
pub use generator::MassingGenerator;
pub use params::{BuildingParameters, StructuralGrid, StructuralSystem, Usage};
pub use shape::FootprintShape;

/// One storey of the massing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlate {
    /// 1-based floor number (1 = ground floor).
    pub level: u32,
    pub footprint: Polygon,
    /// Height of the floor slab above ground [m].
    pub elevation: f64,
    /// Floor-to-floor height [m].
    pub height: f64,
}

impl FloorPlate {
    /// Elevation of the top of this storey [m].
    pub fn top(&self) -> f64 {
        self.elevation + self.height
    }
}

/// Where set-back floors are pinned when they shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetbackAnchor {
    /// Shrink about the center of the base footprint.
    Centered,
    /// Keep the equator-facing edge, pull the pole-side facade in.
    Equatorward,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setback {
    /// First floor (1-based) with the reduced footprint.
    pub start_floor: u32,
    /// Linear shrink factor of width and depth.
    pub ratio: f64,
    pub anchor: SetbackAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balcony {
    /// Floor (1-based) the balcony belongs to.
    pub level: u32,
    /// Center of the balcony slab in plan.
    pub position: Point,
    pub width: f64,
    pub depth: f64,
    /// Slab elevation above ground [m].
    pub elevation: f64,
    pub outline: Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Foundation {
    pub footprint: Polygon,
    /// Top of the foundation (= ground floor elevation) [m].
    pub top_elevation: f64,
    /// Extrusion depth below the top [m].
    pub depth: f64,
}

/// Generated massing of the subject building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingMassing {
    floors: Vec<FloorPlate>,
    width: f64,
    depth: f64,
    shape: FootprintShape,
    setback: Option<Setback>,
    balconies: Vec<Balcony>,
    foundation: Foundation,
    grid: StructuralGrid,
}

impl BuildingMassing {
    pub(crate) fn new(
        floors: Vec<FloorPlate>,
        (width, depth): (f64, f64),
        shape: FootprintShape,
        setback: Option<Setback>,
        balconies: Vec<Balcony>,
        foundation: Foundation,
        grid: StructuralGrid,
    ) -> Self {
        Self {
            floors,
            width,
            depth,
            shape,
            setback,
            balconies,
            foundation,
            grid,
        }
    }

    /// Floor plates ordered from the ground floor up.
    pub fn floors(&self) -> &[FloorPlate] {
        &self.floors
    }

    pub fn floor_count(&self) -> u32 {
        self.floors.len() as u32
    }

    /// Ground floor footprint; also the building boundary used for distances.
    pub fn base_footprint(&self) -> &Polygon {
        &self.floors[0].footprint
    }

    /// Overall bounding width (east-west) [m].
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Overall bounding depth (north-south) [m].
    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn shape(&self) -> FootprintShape {
        self.shape
    }

    pub fn setback(&self) -> Option<&Setback> {
        self.setback.as_ref()
    }

    pub fn balconies(&self) -> &[Balcony] {
        &self.balconies
    }

    pub fn foundation(&self) -> &Foundation {
        &self.foundation
    }

    pub fn structural_grid(&self) -> &StructuralGrid {
        &self.grid
    }

    /// Height of the roof above ground [m].
    pub fn total_height(&self) -> f64 {
        self.floors.last().map(|f| f.top()).unwrap_or(0.0)
    }

    /// Sum of the generated floor plate areas [m2].
    pub fn gross_floor_area(&self) -> f64 {
        self.floors.iter().map(|f| f.footprint.area()).sum()
    }

    /// Returns true if `pt` lies inside (or on) any floor footprint.
    pub fn covers(&self, pt: Point) -> bool {
        self.floors.iter().any(|f| f.footprint.is_point_inside(pt, true))
    }
}
