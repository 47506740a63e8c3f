use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::massing::BuildingParameters;
use crate::regulation::resolver::is_valid_floor_area_ratio;
use crate::regulation::{NeighborParcel, RegulationOverrides};
use crate::site::SiteLocation;

/// Everything a compliance check needs, already resolved by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRequest {
    pub site: SiteLocation,
    pub building: BuildingParameters,
    /// Zoning classification as supplied by the zoning lookup.
    pub zoning: String,
    /// Floor-area ratio [%].
    pub floor_area_ratio: f64,
    /// Previously confirmed values for this project.
    #[serde(default)]
    pub overrides: Option<RegulationOverrides>,
    /// Neighboring parcels, used when the site zone is not regulated itself.
    #[serde(default)]
    pub neighbors: Vec<NeighborParcel>,
    /// Defaults to the most recent winter solstice.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl ComplianceRequest {
    pub fn new(
        site: SiteLocation,
        building: BuildingParameters,
        zoning: impl Into<String>,
        floor_area_ratio: f64,
    ) -> Self {
        Self {
            site,
            building,
            zoning: zoning.into(),
            floor_area_ratio,
            overrides: None,
            neighbors: Vec::new(),
            reference_date: None,
        }
    }

    pub fn with_overrides(mut self, overrides: RegulationOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_neighbors(mut self, neighbors: Vec<NeighborParcel>) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Checks the site, the building parameters and the floor-area ratio.
    pub fn validate(&self) -> Result<()> {
        self.site.validate()?;
        self.building.validate()?;
        if !is_valid_floor_area_ratio(self.floor_area_ratio) {
            return Err(Error::Input(format!(
                "floor-area ratio must be positive, got {}",
                self.floor_area_ratio
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::massing::{StructuralSystem, Usage};

    fn request() -> ComplianceRequest {
        ComplianceRequest::new(
            SiteLocation::new(35.0, 139.0, "").unwrap(),
            BuildingParameters {
                usage: Usage::ResidentialSingle,
                structure: StructuralSystem::TimberFrame,
                floors: 2,
                building_area: 80.0,
                total_floor_area: 150.0,
                max_height: 7.0,
                unit_count: Some(1),
            },
            "第一種低層住居専用地域",
            80.0,
        )
    }

    #[test]
    fn test_validate() {
        assert!(request().validate().is_ok());

        let mut r = request();
        r.site.latitude = 95.0;
        assert!(matches!(r.validate(), Err(Error::Input(_))));

        let mut r = request();
        r.building.floors = 0;
        assert!(matches!(r.validate(), Err(Error::InvalidParameters(_))));

        let mut r = request();
        r.floor_area_ratio = f64::NAN;
        assert!(matches!(r.validate(), Err(Error::Input(_))));

        let mut r = request();
        r.floor_area_ratio = 0.0;
        assert!(matches!(r.validate(), Err(Error::Input(_))));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "site": {"latitude": 35.0, "longitude": 139.0},
            "building": {
                "usage": "office", "structure": "steel-frame", "floors": 3,
                "building_area": 200.0, "total_floor_area": 600.0, "max_height": 12.0
            },
            "zoning": "commercial",
            "floor_area_ratio": 400.0
        }"#;
        let r: ComplianceRequest = serde_json::from_str(json).unwrap();
        assert!(r.overrides.is_none());
        assert!(r.neighbors.is_empty());
        assert!(r.reference_date.is_none());
    }
}
