use serde::{Deserialize, Serialize};

/// Configuration for massing generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassingConfig {
    /// Buildings with more floors than this get a setback.
    pub setback_trigger_floors: u32,
    /// Fraction of the floor count above which floors are set back.
    pub setback_percentile: f64,
    /// Linear shrink factor applied to set-back floors.
    pub setback_ratio: f64,
    /// Multi-unit residential slabs wider than this turn into an L-shape [m].
    pub l_shape_min_width: f64,
    /// Multi-unit residential programs with more units than this get a U-shape.
    pub u_shape_min_units: u32,
    /// Balcony width along the facade [m].
    pub balcony_width: f64,
    /// Balcony projection from the facade [m].
    pub balcony_depth: f64,
    /// Gap between neighboring balconies [m].
    pub balcony_gap: f64,
    /// Linear enlargement of the foundation slab over the base footprint.
    pub foundation_enlargement: f64,
}

impl MassingConfig {
    pub fn new() -> Self {
        Self {
            setback_trigger_floors: 5,
            setback_percentile: 0.6,
            setback_ratio: 0.8,
            l_shape_min_width: 40.0,
            u_shape_min_units: 50,
            balcony_width: 3.0,
            balcony_depth: 1.2,
            balcony_gap: 1.0,
            foundation_enlargement: 1.10,
        }
    }
}

impl Default for MassingConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MassingConfig::new();
        assert_eq!(config.setback_trigger_floors, 5);
        assert_eq!(config.setback_ratio, 0.8);
        assert_eq!(config.u_shape_min_units, 50);
    }

    #[test]
    fn test_partial_json() {
        let config: MassingConfig = serde_json::from_str("{\"setback_ratio\": 0.7}").unwrap();
        assert_eq!(config.setback_ratio, 0.7);
        assert_eq!(config.balcony_width, 3.0);
    }
}
