use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::Vector;
use crate::site::SiteLocation;

/// Solar position (azimuth and altitude angles).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Solar altitude angle in degrees (0 = horizon, 90 = zenith).
    pub altitude: f64,
    /// Solar azimuth angle in degrees from north, clockwise (0=N, 90=E, 180=S, 270=W).
    pub azimuth: f64,
}

impl SolarPosition {
    /// Calculates the solar position with Cooper's declination.
    ///
    /// - `latitude`: in degrees (positive north)
    /// - `day_of_year`: 1-366
    /// - `hour`: true solar time in hours (0-24), so longitude plays no part
    pub fn calculate(latitude: f64, day_of_year: u32, hour: f64) -> Self {
        let lat = latitude.to_radians();

        let declination = (23.45_f64
            * (360.0 * (284.0 + day_of_year as f64) / 365.0)
                .to_radians()
                .sin())
        .to_radians();

        // Hour angle (15 degrees per hour from solar noon)
        let hour_angle = ((hour - 12.0) * 15.0).to_radians();

        let sin_alt =
            lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
        let altitude = sin_alt.clamp(-1.0, 1.0).asin().to_degrees();

        let azimuth = (-hour_angle.sin())
            .atan2(declination.tan() * lat.cos() - lat.sin() * hour_angle.cos())
            .to_degrees();
        let mut azimuth = azimuth.rem_euclid(360.0);
        if azimuth >= 360.0 {
            azimuth = 0.0;
        }

        Self { altitude, azimuth }
    }

    /// Solar position at a local (true solar) timestamp.
    pub fn at(site: &SiteLocation, time: NaiveDateTime) -> Self {
        let hour = time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0;
        Self::calculate(site.latitude, time.ordinal(), hour)
    }

    /// Returns true if the sun is above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }

    /// Horizontal displacement of the shadow cast by a point `height` meters
    /// above the receiving plane.
    ///
    /// The shadow points away from the sun. Returns `None` when the sun is at
    /// or below the horizon.
    pub fn shadow_offset(&self, height: f64) -> Option<Vector> {
        if !self.is_above_horizon() {
            return None;
        }
        let length = height / self.altitude.to_radians().tan();
        Some(Vector::from_azimuth(self.azimuth + 180.0) * length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_winter_solstice_noon_tokyo() {
        // Day 355: declination close to -23.45 deg
        let pos = SolarPosition::calculate(35.68, 355, 12.0);
        let expected = 90.0 - 35.68 - 23.45;
        assert!((pos.altitude - expected).abs() < 0.1, "alt {}", pos.altitude);
        assert!((pos.azimuth - 180.0).abs() < 1e-6, "azi {}", pos.azimuth);
    }

    #[test]
    fn test_morning_is_east_afternoon_is_west() {
        let am = SolarPosition::calculate(35.0, 355, 9.0);
        let pm = SolarPosition::calculate(35.0, 355, 15.0);
        assert!(am.azimuth > 90.0 && am.azimuth < 180.0);
        assert!(pm.azimuth > 180.0 && pm.azimuth < 270.0);
        // Symmetric around solar noon
        assert!((am.altitude - pm.altitude).abs() < 1e-9);
        assert!((am.azimuth + pm.azimuth - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_solar_midnight() {
        let pos = SolarPosition::calculate(45.0, 355, 0.0);
        assert!(!pos.is_above_horizon());
        assert!(pos.shadow_offset(10.0).is_none());
    }

    #[test]
    fn test_equator_equinox_noon() {
        let pos = SolarPosition::calculate(0.0, 80, 12.0);
        assert!(pos.altitude > 88.0);
    }

    #[test]
    fn test_shadow_points_away_from_sun() {
        let pos = SolarPosition {
            altitude: 45.0,
            azimuth: 180.0,
        };
        let v = pos.shadow_offset(10.0).unwrap();
        assert!(v.dx.abs() < 1e-9);
        assert!((v.dy - 10.0).abs() < 1e-9);

        let pos = SolarPosition {
            altitude: 45.0,
            azimuth: 90.0,
        };
        let v = pos.shadow_offset(10.0).unwrap();
        assert!((v.dx + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_at_timestamp() {
        let site = SiteLocation::new(35.0, 135.0, "").unwrap();
        let t = NaiveDate::from_ymd_opt(2025, 12, 21)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let a = SolarPosition::at(&site, t);
        let b = SolarPosition::calculate(35.0, t.ordinal(), 10.5);
        assert_eq!(a, b);
    }
}
