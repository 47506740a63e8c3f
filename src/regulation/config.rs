use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// Configuration for regulation resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulationConfig {
    /// Regulated daily time window (true solar time).
    pub window: TimeWindow,
}

impl RegulationConfig {
    pub fn new() -> Self {
        Self {
            window: TimeWindow::new(8.0, 16.0),
        }
    }
}

impl Default for RegulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
