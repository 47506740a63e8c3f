use serde::{Deserialize, Serialize};

/// How an element's shadow footprint is tested against a sample point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowModel {
    /// Point lies inside the element outline translated by the shadow offset
    /// of the element's top.
    Translated,
    /// Point lies anywhere between the offsets of the element's bottom and
    /// top (the outline swept along the shadow direction).
    Swept,
}

/// Configuration for a shadow compliance simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Spacing of the sample grid [m]. Each point stands for one cell.
    pub grid_cell_size: f64,
    /// Sample points are kept up to this distance from the building [m].
    pub grid_radius: f64,
    /// Points at or below this distance use the near-band limit [m].
    pub near_band_limit_distance: f64,
    pub shadow_model: ShadowModel,
    /// Evaluate sample points on the rayon thread pool.
    pub parallel: bool,
    /// Height of the balcony parapet above the slab [m].
    pub balcony_rail_height: f64,
}

impl ShadowConfig {
    pub fn new() -> Self {
        Self {
            grid_cell_size: 1.0,
            grid_radius: 50.0,
            near_band_limit_distance: 10.0,
            shadow_model: ShadowModel::Translated,
            parallel: true,
            balcony_rail_height: 1.1,
        }
    }

    /// Area represented by one sample point [m2].
    pub fn cell_area(&self) -> f64 {
        self.grid_cell_size * self.grid_cell_size
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ShadowConfig::new();
        assert_eq!(config.grid_cell_size, 1.0);
        assert_eq!(config.near_band_limit_distance, 10.0);
        assert_eq!(config.shadow_model, ShadowModel::Translated);
        assert!(config.parallel);
        assert_eq!(config.cell_area(), 1.0);
    }

    #[test]
    fn test_partial_json() {
        let config: ShadowConfig =
            serde_json::from_str(r#"{"grid_cell_size": 2.0, "shadow_model": "swept"}"#).unwrap();
        assert_eq!(config.grid_cell_size, 2.0);
        assert_eq!(config.shadow_model, ShadowModel::Swept);
        assert_eq!(config.grid_radius, 50.0);
    }
}
