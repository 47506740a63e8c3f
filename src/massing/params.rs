use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// More storeys than any building ever built.
const MAX_FLOORS: u32 = 500;

/// Usage category of the building program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Usage {
    ResidentialMulti,
    ResidentialSingle,
    Commercial,
    Office,
    Other,
}

impl Usage {
    pub fn is_residential(&self) -> bool {
        matches!(self, Usage::ResidentialMulti | Usage::ResidentialSingle)
    }

    /// Plan aspect ratio (width / depth) used to lay out the footprint.
    ///
    /// Larger multi-unit programs get longer slabs; single-family houses stay
    /// close to square.
    pub fn aspect_ratio(&self, unit_count: Option<u32>, building_area: f64) -> f64 {
        match self {
            Usage::ResidentialMulti => match unit_count.unwrap_or(0) {
                0..=20 => 1.3,
                21..=50 => 1.5,
                _ => 1.8,
            },
            Usage::ResidentialSingle => {
                if building_area < 100.0 {
                    1.1
                } else {
                    1.2
                }
            }
            Usage::Commercial => {
                if building_area < 1000.0 {
                    1.5
                } else {
                    1.8
                }
            }
            Usage::Office => 1.3,
            Usage::Other => 1.2,
        }
    }

    /// Ground floor height relative to a typical floor.
    pub fn ground_floor_multiplier(&self) -> f64 {
        match self {
            Usage::Office => 1.2,
            Usage::Commercial => 1.5,
            _ => 1.0,
        }
    }
}

/// Structural system of the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralSystem {
    /// Wall-type reinforced concrete (壁式RC).
    WallTypeRc,
    /// Rigid-frame reinforced concrete.
    RigidFrameRc,
    SteelFrame,
    /// Steel-reinforced concrete (SRC).
    SteelReinforcedConcrete,
    TimberFrame,
}

/// Structural grid and default storey height of a structural system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralGrid {
    /// Column / wall spacing [m].
    pub span: f64,
    /// Default floor-to-floor height [m].
    pub floor_height: f64,
    /// Foundation height [m].
    pub foundation_height: f64,
}

impl StructuralSystem {
    pub fn grid(&self) -> StructuralGrid {
        let (span, floor_height, foundation_height) = match self {
            StructuralSystem::WallTypeRc => (4.5, 2.9, 0.5),
            StructuralSystem::RigidFrameRc => (6.0, 3.2, 0.5),
            StructuralSystem::SteelFrame => (7.2, 3.6, 0.5),
            StructuralSystem::SteelReinforcedConcrete => (7.0, 3.4, 0.6),
            // Two ken (2 x 1.82 m)
            StructuralSystem::TimberFrame => (3.64, 2.9, 0.4),
        };
        StructuralGrid {
            span,
            floor_height,
            foundation_height,
        }
    }
}

/// Scalar description of the planned building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingParameters {
    pub usage: Usage,
    pub structure: StructuralSystem,
    /// Number of floors above ground.
    pub floors: u32,
    /// Building (footprint) area [m2].
    pub building_area: f64,
    /// Total floor area over all floors [m2].
    pub total_floor_area: f64,
    /// Maximum building height above ground [m].
    pub max_height: f64,
    /// Dwelling units; only meaningful for residential usage.
    #[serde(default)]
    pub unit_count: Option<u32>,
}

impl BuildingParameters {
    /// Rejects inputs that cannot produce a massing.
    pub fn validate(&self) -> Result<()> {
        if self.floors < 1 {
            return Err(Error::InvalidParameters(
                "floor count must be at least 1".to_string(),
            ));
        }
        if self.floors > MAX_FLOORS {
            return Err(Error::InvalidParameters(format!(
                "floor count {} exceeds {MAX_FLOORS}",
                self.floors
            )));
        }
        if !(self.building_area.is_finite() && self.building_area > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "building area must be positive, got {}",
                self.building_area
            )));
        }
        if !(self.max_height.is_finite() && self.max_height > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "maximum height must be positive, got {}",
                self.max_height
            )));
        }
        if !self.total_floor_area.is_finite() || self.total_floor_area < self.building_area {
            return Err(Error::InvalidParameters(format!(
                "total floor area {} is smaller than building area {}",
                self.total_floor_area, self.building_area
            )));
        }
        let foundation = self.structure.grid().foundation_height;
        if self.max_height <= foundation {
            return Err(Error::InvalidParameters(format!(
                "maximum height {} does not clear the {} m foundation",
                self.max_height, foundation
            )));
        }
        Ok(())
    }

    /// Unit count if the usage is residential.
    pub fn residential_units(&self) -> Option<u32> {
        if self.usage.is_residential() {
            self.unit_count
        } else {
            None
        }
    }
}
