use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::massing::BuildingMassing;
use crate::regulation::ZoneRegulation;
use crate::sim::solar::{SolarSample, SolarTable};

use super::caster::{CasterKind, ShadowCaster, StepShadow};
use super::config::ShadowConfig;
use super::grid::{GridPoint, sample_grid};
use super::result::{
    ComplianceOutcome, ComplianceResult, CriticalFloor, DistanceBand, GeometryStats,
    ShadowSamplePoint, TimeStepSummary,
};

/// Number of floors reported as critical.
const CRITICAL_FLOOR_COUNT: usize = 3;

/// Tolerance when comparing accumulated hours against a limit.
const HOURS_EPS: f64 = 1e-9;

/// Grid-based shadow compliance simulation for one massing.
pub struct ShadowSimulation<'a> {
    config: ShadowConfig,
    massing: &'a BuildingMassing,
    regulation: &'a ZoneRegulation,
    table: &'a SolarTable,
}

impl<'a> ShadowSimulation<'a> {
    pub fn new(
        massing: &'a BuildingMassing,
        regulation: &'a ZoneRegulation,
        table: &'a SolarTable,
        config: ShadowConfig,
    ) -> Self {
        Self {
            config,
            massing,
            regulation,
            table,
        }
    }

    /// Returns true if the massing exceeds the regulation's trigger thresholds.
    pub fn is_subject(&self) -> bool {
        self.regulation
            .is_subject(self.massing.total_height(), self.massing.floor_count())
    }

    /// Runs the simulation.
    ///
    /// The returned result carries no regulation, date or fingerprint; the
    /// caller attaches those.
    pub fn run(&self) -> Result<ComplianceResult> {
        if !self.is_subject() {
            return Ok(ComplianceResult::not_subject(
                self.massing.total_height(),
                self.massing.floor_count(),
            ));
        }

        let t0 = Instant::now();
        let mh = self.regulation.measurement_height;
        let steps: Vec<&SolarSample> = self
            .table
            .samples
            .iter()
            .filter(|s| self.regulation.window.contains(s.hour))
            .collect();

        let casters = ShadowCaster::collect(self.massing, mh, self.config.balcony_rail_height);
        let step_shadows: Vec<StepShadow> = steps
            .iter()
            .map(|s| StepShadow::project(&casters, &s.position, mh, self.config.shadow_model))
            .collect();

        let grid = sample_grid(
            self.massing,
            self.config.grid_cell_size,
            self.config.grid_radius,
        )?;

        let evaluate = |gp: &GridPoint| self.evaluate_point(gp, &steps, &step_shadows);
        let sample_points: Vec<ShadowSamplePoint> = if self.config.parallel {
            grid.par_iter().map(evaluate).collect()
        } else {
            grid.iter().map(evaluate).collect()
        };

        let mut result = self.aggregate(sample_points, &steps);
        result.stats = self.geometry_stats(&casters);

        debug!(
            "shadow simulation: {} points, {} steps ({} casting nothing), {} casters, {} violating, {:.1} ms",
            result.sample_points.len(),
            steps.len(),
            step_shadows.iter().filter(|s| s.is_empty()).count(),
            casters.len(),
            result.violating_points,
            t0.elapsed().as_secs_f64() * 1e3
        );

        Ok(result)
    }

    fn evaluate_point(
        &self,
        gp: &GridPoint,
        steps: &[&SolarSample],
        step_shadows: &[StepShadow],
    ) -> ShadowSamplePoint {
        let shadowed: Vec<bool> = step_shadows.iter().map(|s| s.shades(gp.position)).collect();
        let shadow_hours: f64 = shadowed
            .iter()
            .zip(steps)
            .filter(|(flag, _)| **flag)
            .map(|(_, s)| s.duration)
            .sum();

        let band = DistanceBand::classify(gp.distance, self.config.near_band_limit_distance);
        let limit_hours = band.limit_hours(self.regulation);
        let compliant = shadow_hours <= limit_hours + HOURS_EPS;

        ShadowSamplePoint {
            position: gp.position,
            distance: gp.distance,
            band,
            shadowed,
            shadow_hours,
            limit_hours,
            compliant,
            violation_hours: if compliant {
                0.0
            } else {
                shadow_hours - limit_hours
            },
        }
    }

    fn aggregate(
        &self,
        sample_points: Vec<ShadowSamplePoint>,
        steps: &[&SolarSample],
    ) -> ComplianceResult {
        let total = sample_points.len();
        let violating = sample_points.iter().filter(|p| !p.compliant).count();
        let max_violation_hours = sample_points
            .iter()
            .map(|p| p.violation_hours)
            .fold(0.0, f64::max);

        let time_steps: Vec<TimeStepSummary> = steps
            .iter()
            .enumerate()
            .map(|(k, s)| {
                let (shadowed_points, violating_points) =
                    sample_points
                        .iter()
                        .fold((0, 0), |(sh, vi), p| match (p.shadowed[k], p.compliant) {
                            (true, false) => (sh + 1, vi + 1),
                            (true, true) => (sh + 1, vi),
                            _ => (sh, vi),
                        });
                TimeStepSummary {
                    hour: s.hour,
                    duration: s.duration,
                    altitude: s.position.altitude,
                    azimuth: s.position.azimuth,
                    shadowed_points,
                    violating_points,
                }
            })
            .collect();

        let daylight: Vec<&TimeStepSummary> =
            time_steps.iter().filter(|t| t.altitude > 0.0).collect();
        // First step wins on ties
        let peak = daylight.iter().copied().fold(None::<&TimeStepSummary>, |best, t| match best {
            Some(b) if b.violating_points >= t.violating_points => Some(b),
            _ => Some(t),
        });
        let best = daylight.iter().copied().fold(None::<&TimeStepSummary>, |best, t| match best {
            Some(b) if b.violating_points <= t.violating_points => Some(b),
            _ => Some(t),
        });

        let compliance_rate = if total == 0 {
            100.0
        } else {
            100.0 * (total - violating) as f64 / total as f64
        };

        ComplianceResult {
            outcome: ComplianceOutcome::Evaluated,
            is_compliant: violating == 0,
            regulation: None,
            reference_date: None,
            fingerprint: None,
            peak_violation_time: peak.filter(|t| t.violating_points > 0).map(|t| t.hour),
            best_compliance_time: best.map(|t| t.hour),
            sample_points,
            time_steps,
            stats: GeometryStats::default(),
            compliance_rate,
            violating_points: violating,
            max_violation_hours,
            violation_area: violating as f64 * self.config.cell_area(),
            recommendations: Vec::new(),
            quick_recheck: false,
        }
    }

    fn geometry_stats(&self, casters: &[ShadowCaster]) -> GeometryStats {
        let mh = self.regulation.measurement_height;

        let largest_plate = casters
            .iter()
            .filter(|c| !matches!(c.kind, CasterKind::Balcony { .. }))
            .map(|c| c.outline.area())
            .fold(0.0, f64::max);
        // Balcony rows stack, so one floor's worth of outlines is the overhang
        let mut balcony_rows: Vec<(u32, f64)> = Vec::new();
        for c in casters {
            if let CasterKind::Balcony { level } = c.kind {
                match balcony_rows.iter_mut().find(|(l, _)| *l == level) {
                    Some((_, a)) => *a += c.outline.area(),
                    None => balcony_rows.push((level, c.outline.area())),
                }
            }
        }
        let overhang = balcony_rows.iter().map(|(_, a)| *a).fold(0.0, f64::max);

        let mut critical_floors: Vec<CriticalFloor> = self
            .massing
            .floors()
            .iter()
            .map(|f| {
                let footprint_area = f.footprint.area();
                CriticalFloor {
                    level: f.level,
                    elevation: f.elevation,
                    footprint_area,
                    impact_score: footprint_area * f.elevation,
                }
            })
            .collect();
        critical_floors.sort_by(|a, b| {
            b.impact_score
                .total_cmp(&a.impact_score)
                .then(a.level.cmp(&b.level))
        });
        critical_floors.truncate(CRITICAL_FLOOR_COUNT);

        GeometryStats {
            effective_footprint_area: largest_plate + overhang,
            shadow_casting_volume: casters.iter().map(|c| c.volume_above(mh)).sum(),
            critical_floors,
        }
    }
}
