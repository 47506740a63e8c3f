//! JSON I/O for requests, building parameters, massings and results.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::engine::{ComplianceRequest, EngineConfig};
use crate::massing::BuildingParameters;

/// Reads any JSON document from a file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize JSON from: {}", path.display()))
}

/// Writes any serializable value to a file as JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    written.with_context(|| format!("Failed to serialize JSON to: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Serializes a value to a JSON string.
pub fn to_json_string<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize value to string")
}

pub fn read_request(path: &Path) -> Result<ComplianceRequest> {
    read_json(path)
}

pub fn read_parameters(path: &Path) -> Result<BuildingParameters> {
    read_json(path)
}

pub fn read_config(path: &Path) -> Result<EngineConfig> {
    read_json(path)
}

/// Deserializes a compliance request from a JSON string.
pub fn request_from_str(json: &str) -> Result<ComplianceRequest> {
    serde_json::from_str(json).context("Failed to deserialize request from string")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shadow::ComplianceResult;

    const REQUEST: &str = r#"{
        "site": {"latitude": 35.68, "longitude": 139.76, "address": "Chiyoda"},
        "building": {
            "usage": "residential-multi", "structure": "rigid-frame-rc", "floors": 5,
            "building_area": 400.0, "total_floor_area": 2000.0, "max_height": 16.0,
            "unit_count": 20
        },
        "zoning": "第一種中高層住居専用地域",
        "floor_area_ratio": 200.0,
        "reference_date": "2025-12-21"
    }"#;

    #[test]
    fn test_request_from_str() {
        let r = request_from_str(REQUEST).unwrap();
        assert_eq!(r.building.floors, 5);
        assert_eq!(r.site.address, "Chiyoda");
        assert_eq!(
            r.reference_date,
            chrono::NaiveDate::from_ymd_opt(2025, 12, 21)
        );
        assert!(request_from_str("{").is_err());
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("daylight3d_io_test_{}.json", std::process::id()));

        let result = ComplianceResult::not_applicable("commercial zone");
        write_json(&path, &result, true).unwrap();
        let back: ComplianceResult = read_json(&path).unwrap();
        assert_eq!(result, back);

        std::fs::remove_file(&path).unwrap();
        let err = read_request(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_partial_config() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"ephemeris": {"step_hours": 0.25}}"#).unwrap();
        assert_eq!(config.ephemeris.step_hours, 0.25);
        assert!(config.ephemeris.sample_at_midpoint);
    }
}
