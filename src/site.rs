//! Site location of the subject building.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Geographic location of the site.
///
/// The address is display-only and never used in computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    /// Latitude in degrees (positive north).
    pub latitude: f64,
    /// Longitude in degrees (positive east).
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
}

impl SiteLocation {
    /// Creates a validated site location.
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Result<Self> {
        let site = Self {
            latitude,
            longitude,
            address: address.into(),
        };
        site.validate()?;
        Ok(site)
    }

    /// Checks that both coordinates are present and in range.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(Error::Input("site coordinates are missing".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Input(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Input(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    pub fn is_southern_hemisphere(&self) -> bool {
        self.latitude < 0.0
    }
}
