//! Design suggestions derived from shadow violations.

use serde::{Deserialize, Serialize};

pub mod rules;

pub use rules::RecommendationEngine;

/// Urgency of a recommendation. Ordered from `Low` to `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Coarse implementation cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostTier {
    Low,
    Medium,
    High,
}

/// Estimated effect of applying a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedImprovement {
    /// Gain in compliance rate [percentage points].
    pub compliance_rate_gain: f64,
    /// Reduction of the violating area [m2].
    pub shadow_reduction_area: f64,
    /// Floor area removed or reworked [m2].
    pub affected_floor_area: f64,
}

/// What to change, with the figures specific to each kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RecommendationKind {
    HeightReduction {
        /// Suggested reduction of the building height [m].
        reduce_by: f64,
        mean_violation_hours: f64,
    },
    Setback {
        /// Suggested setback from the boundary [m].
        distance: f64,
        /// Closest violating point to the building [m].
        nearest_violation_distance: f64,
    },
    FloorReduction {
        /// Floors from this level up are removed.
        from_floor: u32,
        floors_removed: u32,
    },
    ShapeModification {
        current_depth: f64,
        suggested_depth: f64,
        far_band_violations: usize,
    },
    BalconyAdjustment {
        balcony_count: usize,
        current_depth: f64,
        suggested_depth: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub description: String,
    pub improvement: ExpectedImprovement,
    pub cost: CostTier,
}
