use log::{debug, warn};

use super::config::RegulationConfig;
use super::zone::ZoneClass;
use super::{
    NeighborParcel, RegulationOutcome, RegulationOverrides, Sourced, SubjectThreshold,
    ZoneRegulation,
};
use crate::error::{Error, Result};

/// Measurement plane for low-rise zones [m].
const LOW_RISE_MEASUREMENT_HEIGHT: f64 = 1.5;
/// Measurement plane for all other residential zones [m].
const DEFAULT_MEASUREMENT_HEIGHT: f64 = 4.0;

/// Maps zoning classification and floor-area ratio to regulation thresholds.
#[derive(Debug, Clone, Default)]
pub struct RegulationResolver {
    config: RegulationConfig,
}

impl RegulationResolver {
    pub fn new(config: RegulationConfig) -> Self {
        Self { config }
    }

    /// Resolves the regulation for a site.
    ///
    /// - Residential zones come straight from the decision table.
    /// - Commercial and industrial zones are unregulated unless a regulated
    ///   residential parcel is among `neighbors`; then the nearest one's
    ///   thresholds are borrowed.
    /// - Unrecognized zones fall back to the strictest low-rise thresholds.
    ///
    /// Confirmed `overrides` replace measurement height and both hour limits
    /// of whichever regulation is resolved.
    pub fn resolve(
        &self,
        zone: &str,
        floor_area_ratio: f64,
        overrides: Option<&RegulationOverrides>,
        neighbors: &[NeighborParcel],
    ) -> Result<RegulationOutcome> {
        if !is_valid_floor_area_ratio(floor_area_ratio) {
            return Err(Error::Input(format!(
                "floor-area ratio must be a positive percentage, got {floor_area_ratio}"
            )));
        }
        if let Some(o) = overrides {
            validate_overrides(o)?;
        }

        let class = ZoneClass::parse(zone);
        let sourced = match class {
            ZoneClass::Commercial | ZoneClass::Industrial => {
                match self.nearest_regulated_neighbor(neighbors) {
                    Some((neighbor, neighbor_class)) => {
                        let value = self.table(
                            &neighbor.zone,
                            neighbor_class,
                            neighbor.floor_area_ratio,
                        );
                        warn!(
                            "zone '{}' is not regulated; borrowing '{}' from a neighbor {:.1} m away",
                            zone, neighbor.zone, neighbor.distance
                        );
                        Sourced::Borrowed {
                            value,
                            neighbor: neighbor.clone(),
                        }
                    }
                    None => {
                        debug!("zone '{zone}' carries no shadow regulation");
                        return Ok(RegulationOutcome::NotApplicable {
                            zone_name: zone.to_string(),
                            reason: format!(
                                "{class:?} zones are not regulated and no regulated residential neighbor was supplied"
                            ),
                        });
                    }
                }
            }
            ZoneClass::Unknown => {
                warn!("unrecognized zoning '{zone}'; using conservative low-rise thresholds");
                Sourced::Fallback {
                    value: self.conservative(zone),
                    reason: format!("unrecognized zoning classification '{zone}'"),
                }
            }
            _ => Sourced::Primary(self.table(zone, class, floor_area_ratio)),
        };

        let sourced = match overrides {
            Some(o) if !o.is_empty() => sourced.map(|r| apply_overrides(r, o)),
            _ => sourced,
        };
        Ok(RegulationOutcome::Regulated(sourced))
    }

    /// Decision table for the regulated residential tiers.
    pub fn table(&self, zone_name: &str, class: ZoneClass, far: f64) -> ZoneRegulation {
        let (subject, measurement_height, (near, far_limit)) = match class {
            ZoneClass::LowRiseResidential => (
                SubjectThreshold {
                    height_above: 7.0,
                    floors_at_least: Some(3),
                },
                LOW_RISE_MEASUREMENT_HEIGHT,
                if far <= 100.0 { (3.0, 2.0) } else { (4.0, 2.5) },
            ),
            ZoneClass::MidHighRiseResidential => (
                SubjectThreshold {
                    height_above: 10.0,
                    floors_at_least: None,
                },
                DEFAULT_MEASUREMENT_HEIGHT,
                if far <= 150.0 {
                    (3.0, 2.0)
                } else if far <= 200.0 {
                    (4.0, 2.5)
                } else {
                    (5.0, 3.0)
                },
            ),
            ZoneClass::GeneralResidential => (
                SubjectThreshold {
                    height_above: 10.0,
                    floors_at_least: None,
                },
                DEFAULT_MEASUREMENT_HEIGHT,
                if far <= 200.0 { (4.0, 2.5) } else { (5.0, 3.0) },
            ),
            // Non-residential tiers only reach here as a caller mistake
            _ => return self.conservative(zone_name),
        };
        ZoneRegulation {
            zone_name: zone_name.to_string(),
            zone_class: class,
            subject,
            measurement_height,
            window: self.config.window,
            near_limit_hours: near,
            far_limit_hours: far_limit,
            overridden: false,
        }
    }

    /// Strictest low-rise thresholds.
    fn conservative(&self, zone_name: &str) -> ZoneRegulation {
        ZoneRegulation {
            zone_name: zone_name.to_string(),
            zone_class: ZoneClass::LowRiseResidential,
            subject: SubjectThreshold {
                height_above: 7.0,
                floors_at_least: Some(3),
            },
            measurement_height: LOW_RISE_MEASUREMENT_HEIGHT,
            window: self.config.window,
            near_limit_hours: 3.0,
            far_limit_hours: 2.0,
            overridden: false,
        }
    }

    /// Nearest neighbor with a regulated residential zone; ties keep input order.
    fn nearest_regulated_neighbor<'a>(
        &self,
        neighbors: &'a [NeighborParcel],
    ) -> Option<(&'a NeighborParcel, ZoneClass)> {
        let mut best: Option<(&NeighborParcel, ZoneClass)> = None;
        for n in neighbors {
            if !n.distance.is_finite() || n.distance < 0.0 {
                warn!("ignoring neighbor '{}' with invalid distance {}", n.zone, n.distance);
                continue;
            }
            if !is_valid_floor_area_ratio(n.floor_area_ratio) {
                warn!(
                    "ignoring neighbor '{}' with invalid floor-area ratio {}",
                    n.zone, n.floor_area_ratio
                );
                continue;
            }
            let class = ZoneClass::parse(&n.zone);
            if !class.is_regulated_residential() {
                continue;
            }
            if best.is_none_or(|(b, _)| n.distance < b.distance) {
                best = Some((n, class));
            }
        }
        best
    }
}

/// Floor-area ratios are positive, finite percentages.
pub fn is_valid_floor_area_ratio(far: f64) -> bool {
    far.is_finite() && far > 0.0
}

fn validate_overrides(o: &RegulationOverrides) -> Result<()> {
    let checks = [
        ("measurement height", o.measurement_height),
        ("near-band limit", o.near_limit_hours),
        ("far-band limit", o.far_limit_hours),
    ];
    for (name, value) in checks {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Input(format!("override {name} must be >= 0, got {v}")));
            }
        }
    }
    Ok(())
}

fn apply_overrides(mut r: ZoneRegulation, o: &RegulationOverrides) -> ZoneRegulation {
    if let Some(v) = o.measurement_height {
        r.measurement_height = v;
    }
    if let Some(v) = o.near_limit_hours {
        r.near_limit_hours = v;
    }
    if let Some(v) = o.far_limit_hours {
        r.far_limit_hours = v;
    }
    r.overridden = true;
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(zone: &str, far: f64) -> RegulationOutcome {
        RegulationResolver::default()
            .resolve(zone, far, None, &[])
            .unwrap()
    }

    fn limits(outcome: &RegulationOutcome) -> (f64, f64, f64) {
        let r = outcome.regulation().unwrap();
        (r.measurement_height, r.near_limit_hours, r.far_limit_hours)
    }

    #[test]
    fn test_low_rise_tiers() {
        assert_eq!(limits(&resolve("第一種低層住居専用地域", 100.0)), (1.5, 3.0, 2.0));
        assert_eq!(limits(&resolve("第一種低層住居専用地域", 150.0)), (1.5, 4.0, 2.5));
        let r = resolve("low-rise-exclusive-residential", 80.0);
        let reg = r.regulation().unwrap();
        assert!(!reg.is_subject(6.0, 2));
        assert!(reg.is_subject(6.0, 3));
        assert!(reg.is_subject(7.5, 2));
    }

    #[test]
    fn test_mid_high_tiers() {
        assert_eq!(limits(&resolve("第一種中高層住居専用地域", 150.0)), (4.0, 3.0, 2.0));
        assert_eq!(limits(&resolve("第一種中高層住居専用地域", 200.0)), (4.0, 4.0, 2.5));
        assert_eq!(limits(&resolve("第一種中高層住居専用地域", 300.0)), (4.0, 5.0, 3.0));
    }

    #[test]
    fn test_general_residential_tiers() {
        assert_eq!(limits(&resolve("準住居地域", 200.0)), (4.0, 4.0, 2.5));
        assert_eq!(limits(&resolve("第一種住居地域", 300.0)), (4.0, 5.0, 3.0));
        let r = resolve("第二種住居地域", 200.0);
        assert!(!r.regulation().unwrap().is_subject(10.0, 8));
    }

    #[test]
    fn test_commercial_not_applicable() {
        let r = resolve("商業地域", 600.0);
        assert!(matches!(r, RegulationOutcome::NotApplicable { .. }));
        assert!(r.regulation().is_none());
    }

    #[test]
    fn test_commercial_borrows_nearest_residential() {
        let neighbors = vec![
            NeighborParcel {
                zone: "近隣商業地域".to_string(),
                floor_area_ratio: 300.0,
                distance: 5.0,
            },
            NeighborParcel {
                zone: "第一種住居地域".to_string(),
                floor_area_ratio: 200.0,
                distance: 30.0,
            },
            NeighborParcel {
                zone: "第一種低層住居専用地域".to_string(),
                floor_area_ratio: 100.0,
                distance: 12.0,
            },
        ];
        let r = RegulationResolver::default()
            .resolve("商業地域", 600.0, None, &neighbors)
            .unwrap();
        let RegulationOutcome::Regulated(sourced) = r else {
            panic!("expected a borrowed regulation");
        };
        assert!(sourced.is_borrowed());
        let reg = sourced.value();
        assert_eq!(reg.zone_class, ZoneClass::LowRiseResidential);
        assert_eq!((reg.near_limit_hours, reg.far_limit_hours), (3.0, 2.0));
        if let Sourced::Borrowed { neighbor, .. } = &sourced {
            assert_eq!(neighbor.distance, 12.0);
        }
    }

    #[test]
    fn test_unknown_zone_falls_back() {
        let r = resolve("市街化調整区域", 200.0);
        let RegulationOutcome::Regulated(sourced) = r else {
            panic!("expected a fallback regulation");
        };
        assert!(sourced.is_fallback());
        let reg = sourced.value();
        assert_eq!(reg.measurement_height, 1.5);
        assert_eq!((reg.near_limit_hours, reg.far_limit_hours), (3.0, 2.0));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = RegulationOverrides {
            measurement_height: Some(6.5),
            near_limit_hours: Some(5.0),
            far_limit_hours: None,
            target_building: Some("height > 10 m".to_string()),
        };
        let r = RegulationResolver::default()
            .resolve("第一種住居地域", 200.0, Some(&overrides), &[])
            .unwrap();
        let reg = r.regulation().unwrap();
        assert_eq!(reg.measurement_height, 6.5);
        assert_eq!(reg.near_limit_hours, 5.0);
        assert_eq!(reg.far_limit_hours, 2.5);
        assert!(reg.overridden);
    }

    #[test]
    fn test_invalid_inputs() {
        let resolver = RegulationResolver::default();
        assert!(matches!(
            resolver.resolve("商業地域", f64::NAN, None, &[]),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            resolver.resolve("第一種低層住居専用地域", 0.0, None, &[]),
            Err(Error::Input(_))
        ));
        let bad = RegulationOverrides {
            near_limit_hours: Some(-1.0),
            ..Default::default()
        };
        assert!(resolver.resolve("準住居地域", 200.0, Some(&bad), &[]).is_err());
    }
}
