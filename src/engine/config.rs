use serde::{Deserialize, Serialize};

use crate::massing::MassingConfig;
use crate::regulation::RegulationConfig;
use crate::sim::shadow::ShadowConfig;
use crate::sim::solar::EphemerisConfig;

/// Whether a minor edit of a compliant design may skip resimulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RecheckPolicy {
    /// Always run the full simulation.
    #[default]
    Disabled,
    /// Reuse the last compliant result when only the height and the building
    /// area changed, and grew by no more than these amounts.
    Quick {
        /// Maximum height increase [m].
        max_height_increase: f64,
        /// Maximum relative building area increase (0.05 = 5%).
        max_area_increase_ratio: f64,
    },
}

/// Configuration of every stage of a compliance run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub shadow: ShadowConfig,
    pub ephemeris: EphemerisConfig,
    pub massing: MassingConfig,
    pub regulation: RegulationConfig,
    pub recheck: RecheckPolicy,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.recheck, RecheckPolicy::Disabled);
        assert_eq!(config.shadow.grid_radius, 50.0);
        assert_eq!(config.ephemeris.step_hours, 0.5);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "shadow": {"grid_cell_size": 2.0},
            "recheck": {"mode": "quick", "max_height_increase": 0.5, "max_area_increase_ratio": 0.02}
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.shadow.grid_cell_size, 2.0);
        assert_eq!(config.shadow.grid_radius, 50.0);
        assert!(matches!(config.recheck, RecheckPolicy::Quick { .. }));
    }
}
