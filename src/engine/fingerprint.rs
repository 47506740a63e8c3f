use chrono::NaiveDate;
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use super::request::ComplianceRequest;
use crate::error::{Error, Result};
use crate::massing::BuildingParameters;
use crate::regulation::{NeighborParcel, RegulationOverrides};

/// Fields that determine a result. The display-only site address is left out.
#[derive(Serialize)]
struct FingerprintInput<'a> {
    latitude: f64,
    longitude: f64,
    building: &'a BuildingParameters,
    zoning: &'a str,
    floor_area_ratio: f64,
    overrides: Option<&'a RegulationOverrides>,
    neighbors: &'a [NeighborParcel],
    reference_date: NaiveDate,
}

/// Stable 64-bit fingerprint of a request and its resolved reference date.
pub fn fingerprint(request: &ComplianceRequest, reference_date: NaiveDate) -> Result<u64> {
    let input = FingerprintInput {
        latitude: request.site.latitude,
        longitude: request.site.longitude,
        building: &request.building,
        zoning: &request.zoning,
        floor_area_ratio: request.floor_area_ratio,
        overrides: request.overrides.as_ref(),
        neighbors: &request.neighbors,
        reference_date,
    };
    let bytes = serde_json::to_vec(&input)
        .map_err(|e| Error::Input(format!("request cannot be encoded: {e}")))?;
    Ok(xxh3_64(&bytes))
}
