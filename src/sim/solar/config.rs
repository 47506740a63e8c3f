use serde::{Deserialize, Serialize};

/// Configuration for the ephemeris table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Time step [h]. Half an hour matches daylight-monitoring practice.
    pub step_hours: f64,
    /// Evaluate the sun in the middle of each step instead of at its start.
    pub sample_at_midpoint: bool,
}

impl EphemerisConfig {
    pub fn new() -> Self {
        Self {
            step_hours: 0.5,
            sample_at_midpoint: true,
        }
    }
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self::new()
    }
}
