use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::config::EphemerisConfig;
use super::position::SolarPosition;
use crate::error::{Error, Result};
use crate::regulation::TimeWindow;
use crate::site::SiteLocation;

const MIN_STEP_HOURS: f64 = 1.0 / 60.0;

/// One time step of the ephemeris table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarSample {
    /// Solar time at which the sun was evaluated [h].
    pub hour: f64,
    /// Length of the interval this sample stands for [h].
    pub duration: f64,
    pub position: SolarPosition,
}

/// Sun positions over a regulated window on one reference date.
///
/// Computed once per run and shared by every sample point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarTable {
    pub date: NaiveDate,
    pub window: TimeWindow,
    pub samples: Vec<SolarSample>,
}

impl SolarTable {
    /// Computes the table for `window` on `date` at `site`.
    pub fn compute(
        site: &SiteLocation,
        date: NaiveDate,
        window: &TimeWindow,
        config: &EphemerisConfig,
    ) -> Result<Self> {
        let step = config.step_hours;
        if !step.is_finite() || step < MIN_STEP_HOURS {
            return Err(Error::Input(format!(
                "time step must be at least one minute, got {step} h"
            )));
        }
        if !(window.start_hour.is_finite() && window.end_hour.is_finite())
            || window.start_hour < 0.0
            || window.end_hour > 24.0
            || window.end_hour <= window.start_hour
        {
            return Err(Error::Input(format!(
                "invalid time window {}-{} h",
                window.start_hour, window.end_hour
            )));
        }

        let day = date.ordinal();
        let n = (window.duration() / step - 1e-9).ceil() as usize;
        let samples = (0..n)
            .map(|i| {
                let t0 = window.start_hour + i as f64 * step;
                let t1 = (t0 + step).min(window.end_hour);
                let hour = if config.sample_at_midpoint {
                    0.5 * (t0 + t1)
                } else {
                    t0
                };
                SolarSample {
                    hour,
                    duration: t1 - t0,
                    position: SolarPosition::calculate(site.latitude, day, hour),
                }
            })
            .collect();

        Ok(Self {
            date,
            window: *window,
            samples,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Lowest altitude among steps with the sun above the horizon.
    pub fn min_altitude_above_horizon(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.position.altitude)
            .filter(|&a| a > 0.0)
            .min_by(f64::total_cmp)
    }
}

/// Most recent winter solstice on or before `today`.
///
/// 21 December in the northern hemisphere, 21 June in the southern one.
pub fn reference_winter_solstice(today: NaiveDate, latitude: f64) -> Result<NaiveDate> {
    let (month, day) = if latitude < 0.0 { (6, 21) } else { (12, 21) };
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    let candidate = match this_year {
        Some(d) if d <= today => Some(d),
        _ => NaiveDate::from_ymd_opt(today.year() - 1, month, day),
    };
    candidate.ok_or_else(|| Error::Input(format!("no reference solstice before {today}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteLocation {
        SiteLocation::new(35.68, 139.76, "Tokyo").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_eight_to_sixteen_half_hour() {
        let table = SolarTable::compute(
            &site(),
            date(2025, 12, 21),
            &TimeWindow::new(8.0, 16.0),
            &EphemerisConfig::new(),
        )
        .unwrap();
        assert_eq!(table.len(), 16);
        assert_eq!(table.samples[0].hour, 8.25);
        assert_eq!(table.samples[15].hour, 15.75);
        let total: f64 = table.samples.iter().map(|s| s.duration).sum();
        assert!((total - 8.0).abs() < 1e-12);
        assert!(table.samples.iter().all(|s| s.position.is_above_horizon()));
    }

    #[test]
    fn test_partial_last_step() {
        let config = EphemerisConfig {
            step_hours: 0.5,
            sample_at_midpoint: false,
        };
        let table =
            SolarTable::compute(&site(), date(2025, 12, 21), &TimeWindow::new(9.0, 10.75), &config)
                .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.samples[3].hour, 10.5);
        assert!((table.samples[3].duration - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_min_altitude() {
        let table = SolarTable::compute(
            &site(),
            date(2025, 12, 21),
            &TimeWindow::new(8.0, 16.0),
            &EphemerisConfig::new(),
        )
        .unwrap();
        let min = table.min_altitude_above_horizon().unwrap();
        assert!((min - table.samples[0].position.altitude).abs() < 1e-12);
    }

    #[test]
    fn test_polar_night_has_no_sun() {
        let arctic = SiteLocation::new(78.0, 15.0, "").unwrap();
        let table = SolarTable::compute(
            &arctic,
            date(2025, 12, 21),
            &TimeWindow::new(8.0, 16.0),
            &EphemerisConfig::new(),
        )
        .unwrap();
        assert!(table.min_altitude_above_horizon().is_none());
    }

    #[test]
    fn test_invalid_window_and_step() {
        let config = EphemerisConfig {
            step_hours: 0.0,
            sample_at_midpoint: true,
        };
        assert!(
            SolarTable::compute(&site(), date(2025, 12, 21), &TimeWindow::new(8.0, 16.0), &config)
                .is_err()
        );
        assert!(
            SolarTable::compute(
                &site(),
                date(2025, 12, 21),
                &TimeWindow::new(16.0, 8.0),
                &EphemerisConfig::new()
            )
            .is_err()
        );
    }

    #[test]
    fn test_reference_solstice() {
        assert_eq!(
            reference_winter_solstice(date(2026, 10, 19), 35.0).unwrap(),
            date(2025, 12, 21)
        );
        assert_eq!(
            reference_winter_solstice(date(2026, 12, 21), 35.0).unwrap(),
            date(2026, 12, 21)
        );
        assert_eq!(
            reference_winter_solstice(date(2026, 10, 19), -33.0).unwrap(),
            date(2026, 6, 21)
        );
        assert_eq!(
            reference_winter_solstice(date(2026, 3, 1), -33.0).unwrap(),
            date(2025, 6, 21)
        );
    }
}
