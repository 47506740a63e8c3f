use log::debug;

use crate::massing::BuildingMassing;
use crate::sim::shadow::{ComplianceResult, DistanceBand};

use super::{CostTier, ExpectedImprovement, Priority, Recommendation, RecommendationKind};

/// Mean violation above which a height reduction is suggested [h].
const HEIGHT_TRIGGER_HOURS: f64 = 1.0;
/// Mean violation above which the height reduction is critical [h].
const HEIGHT_CRITICAL_HOURS: f64 = 2.0;
/// Meters of height reduction per mean violation hour.
const HEIGHT_PER_HOUR: f64 = 1.5;
/// Violations within this distance suggest a setback [m].
const SETBACK_TRIGGER_DISTANCE: f64 = 15.0;
const SETBACK_DISTANCE: f64 = 3.0;
/// Plan depth factor for the shape modification.
const SLIMMER_DEPTH_FACTOR: f64 = 0.8;
/// Balcony depth factor for the balcony adjustment.
const BALCONY_DEPTH_FACTOR: f64 = 0.5;
/// Share of the violating area a balcony trim is credited with.
const BALCONY_EFFECT: f64 = 0.05;

/// Turns shadow violations into prioritized design suggestions.
///
/// Each rule fires independently. Improvement figures are first-order
/// estimates that scale the current compliance gap by the relative size of
/// the change.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Recommendations sorted by descending priority. Empty without violations.
    pub fn recommend(
        &self,
        result: &ComplianceResult,
        massing: &BuildingMassing,
    ) -> Vec<Recommendation> {
        if result.violating_points == 0 {
            return Vec::new();
        }

        let ctx = Gap::new(result);
        let mut recs: Vec<Recommendation> = [
            self.height_reduction(result, massing, &ctx),
            self.setback(result, massing, &ctx),
            self.floor_reduction(result, massing, &ctx),
            self.shape_modification(result, massing, &ctx),
            self.balcony_adjustment(massing, &ctx),
        ]
        .into_iter()
        .flatten()
        .collect();

        recs.sort_by(|a, b| b.priority.cmp(&a.priority));
        debug!("{} recommendations", recs.len());
        recs
    }

    fn height_reduction(
        &self,
        result: &ComplianceResult,
        massing: &BuildingMassing,
        gap: &Gap,
    ) -> Option<Recommendation> {
        let mean = result.mean_violation_hours();
        if mean <= HEIGHT_TRIGGER_HOURS {
            return None;
        }
        let height = massing.total_height();
        let reduce_by = (mean * HEIGHT_PER_HOUR).ceil();
        let share = (reduce_by / height).min(1.0);

        Some(Recommendation {
            kind: RecommendationKind::HeightReduction {
                reduce_by,
                mean_violation_hours: mean,
            },
            priority: if mean > HEIGHT_CRITICAL_HOURS {
                Priority::Critical
            } else {
                Priority::High
            },
            description: format!(
                "Reduce the building height by {reduce_by:.0} m (mean violation {mean:.2} h)"
            ),
            improvement: gap.scaled(share, massing.gross_floor_area() * share),
            cost: match reduce_by {
                r if r <= 2.0 => CostTier::Low,
                r if r <= 5.0 => CostTier::Medium,
                _ => CostTier::High,
            },
        })
    }

    fn setback(
        &self,
        result: &ComplianceResult,
        massing: &BuildingMassing,
        gap: &Gap,
    ) -> Option<Recommendation> {
        let close: Vec<f64> = result
            .violations()
            .map(|p| p.distance)
            .filter(|&d| d <= SETBACK_TRIGGER_DISTANCE)
            .collect();
        let nearest = close.iter().copied().reduce(f64::min)?;
        let share = close.len() as f64 / gap.violating as f64
            * (SETBACK_DISTANCE / SETBACK_TRIGGER_DISTANCE);

        Some(Recommendation {
            kind: RecommendationKind::Setback {
                distance: SETBACK_DISTANCE,
                nearest_violation_distance: nearest,
            },
            priority: Priority::High,
            description: format!(
                "Set the building back {SETBACK_DISTANCE:.0} m from the shadow-side boundary"
            ),
            improvement: gap.scaled(
                share,
                SETBACK_DISTANCE * massing.width() * massing.floor_count() as f64,
            ),
            cost: CostTier::Medium,
        })
    }

    fn floor_reduction(
        &self,
        result: &ComplianceResult,
        massing: &BuildingMassing,
        gap: &Gap,
    ) -> Option<Recommendation> {
        let from_floor = result
            .stats
            .critical_floors
            .iter()
            .take(2)
            .map(|f| f.level)
            .min()?;
        // Keep at least the ground floor
        if from_floor < 2 {
            return None;
        }
        let removed: Vec<_> = massing
            .floors()
            .iter()
            .filter(|f| f.level >= from_floor)
            .collect();
        let removed_height: f64 = removed.iter().map(|f| f.height).sum();
        let removed_area: f64 = removed.iter().map(|f| f.footprint.area()).sum();
        let share = (removed_height / massing.total_height()).min(1.0);

        Some(Recommendation {
            kind: RecommendationKind::FloorReduction {
                from_floor,
                floors_removed: removed.len() as u32,
            },
            priority: Priority::Medium,
            description: format!(
                "Remove {} floor(s) from level {from_floor} upward",
                removed.len()
            ),
            improvement: gap.scaled(share, removed_area),
            cost: CostTier::High,
        })
    }

    fn shape_modification(
        &self,
        result: &ComplianceResult,
        massing: &BuildingMassing,
        gap: &Gap,
    ) -> Option<Recommendation> {
        let far = result
            .violations()
            .filter(|p| p.band == DistanceBand::Far)
            .count();
        if far == 0 {
            return None;
        }
        let current_depth = massing.depth();
        let suggested_depth = current_depth * SLIMMER_DEPTH_FACTOR;
        let share = far as f64 / gap.violating as f64 * (1.0 - SLIMMER_DEPTH_FACTOR);

        Some(Recommendation {
            kind: RecommendationKind::ShapeModification {
                current_depth,
                suggested_depth,
                far_band_violations: far,
            },
            priority: Priority::Medium,
            description: format!(
                "Slim the plan along the shadow axis from {current_depth:.1} m to {suggested_depth:.1} m deep"
            ),
            improvement: gap.scaled(share, massing.gross_floor_area()),
            cost: CostTier::High,
        })
    }

    fn balcony_adjustment(&self, massing: &BuildingMassing, gap: &Gap) -> Option<Recommendation> {
        let balconies = massing.balconies();
        let first = balconies.first()?;
        let current_depth = first.depth;
        let suggested_depth = current_depth * BALCONY_DEPTH_FACTOR;
        let trimmed: f64 = balconies
            .iter()
            .map(|b| b.width * (b.depth - b.depth * BALCONY_DEPTH_FACTOR))
            .sum();

        Some(Recommendation {
            kind: RecommendationKind::BalconyAdjustment {
                balcony_count: balconies.len(),
                current_depth,
                suggested_depth,
            },
            priority: Priority::Low,
            description: format!(
                "Trim balcony depth from {current_depth:.1} m to {suggested_depth:.1} m or move balconies off the shadow side"
            ),
            improvement: gap.scaled(BALCONY_EFFECT, trimmed),
            cost: CostTier::Low,
        })
    }
}

/// Compliance gap the estimates are scaled from.
struct Gap {
    violating: usize,
    rate_gap: f64,
    violation_area: f64,
}

impl Gap {
    fn new(result: &ComplianceResult) -> Self {
        Self {
            violating: result.violating_points,
            rate_gap: 100.0 - result.compliance_rate,
            violation_area: result.violation_area,
        }
    }

    fn scaled(&self, share: f64, affected_floor_area: f64) -> ExpectedImprovement {
        let share = share.clamp(0.0, 1.0);
        ExpectedImprovement {
            compliance_rate_gain: self.rate_gap * share,
            shadow_reduction_area: self.violation_area * share,
            affected_floor_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use crate::massing::{BuildingParameters, MassingGenerator, StructuralSystem, Usage};
    use crate::sim::shadow::{CriticalFloor, ShadowSamplePoint};

    fn massing(usage: Usage, floors: u32) -> BuildingMassing {
        let params = BuildingParameters {
            usage,
            structure: StructuralSystem::RigidFrameRc,
            floors,
            building_area: 300.0,
            total_floor_area: 300.0 * floors as f64,
            max_height: 3.2 * floors as f64 + 0.5,
            unit_count: Some(12),
        };
        MassingGenerator::default().generate(&params, None).unwrap()
    }

    fn point(distance: f64, band: DistanceBand, hours: f64, limit: f64) -> ShadowSamplePoint {
        let compliant = hours <= limit;
        ShadowSamplePoint {
            position: Point::new(0.0, 20.0),
            distance,
            band,
            shadowed: vec![],
            shadow_hours: hours,
            limit_hours: limit,
            compliant,
            violation_hours: if compliant { 0.0 } else { hours - limit },
        }
    }

    fn result(points: Vec<ShadowSamplePoint>, m: &BuildingMassing) -> ComplianceResult {
        let mut r = ComplianceResult::not_applicable("fixture");
        let violating = points.iter().filter(|p| !p.compliant).count();
        r.compliance_rate = 100.0 * (points.len() - violating) as f64 / points.len() as f64;
        r.violating_points = violating;
        r.violation_area = violating as f64;
        r.is_compliant = violating == 0;
        r.sample_points = points;
        r.stats.critical_floors = m
            .floors()
            .iter()
            .rev()
            .take(3)
            .map(|f| CriticalFloor {
                level: f.level,
                elevation: f.elevation,
                footprint_area: f.footprint.area(),
                impact_score: f.footprint.area() * f.elevation,
            })
            .collect();
        r
    }

    fn kinds(recs: &[Recommendation]) -> Vec<&'static str> {
        recs.iter()
            .map(|r| match r.kind {
                RecommendationKind::HeightReduction { .. } => "height",
                RecommendationKind::Setback { .. } => "setback",
                RecommendationKind::FloorReduction { .. } => "floors",
                RecommendationKind::ShapeModification { .. } => "shape",
                RecommendationKind::BalconyAdjustment { .. } => "balcony",
            })
            .collect()
    }

    #[test]
    fn test_no_violations_no_recommendations() {
        let m = massing(Usage::ResidentialMulti, 4);
        let r = result(vec![point(5.0, DistanceBand::Near, 1.0, 3.0)], &m);
        assert!(RecommendationEngine::new().recommend(&r, &m).is_empty());
    }

    #[test]
    fn test_all_rules_fire_sorted() {
        let m = massing(Usage::ResidentialMulti, 4);
        let r = result(
            vec![
                point(5.0, DistanceBand::Near, 6.0, 3.0),
                point(12.0, DistanceBand::Far, 5.0, 2.0),
                point(30.0, DistanceBand::Far, 1.0, 2.0),
            ],
            &m,
        );
        let recs = RecommendationEngine::new().recommend(&r, &m);
        assert_eq!(kinds(&recs), vec!["height", "setback", "floors", "shape", "balcony"]);
        assert_eq!(recs[0].priority, Priority::Critical);
        for w in recs.windows(2) {
            assert!(w[0].priority >= w[1].priority);
        }
        match &recs[0].kind {
            RecommendationKind::HeightReduction { reduce_by, .. } => {
                // Mean violation 3 h -> ceil(4.5)
                assert_eq!(*reduce_by, 5.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &recs[2].kind {
            RecommendationKind::FloorReduction {
                from_floor,
                floors_removed,
            } => {
                assert_eq!(*from_floor, 3);
                assert_eq!(*floors_removed, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        for rec in &recs {
            assert!(rec.improvement.compliance_rate_gain >= 0.0);
            assert!(rec.improvement.compliance_rate_gain <= 100.0 - r.compliance_rate);
        }
    }

    #[test]
    fn test_mild_violation_is_high_priority_height() {
        let m = massing(Usage::Office, 4);
        let r = result(vec![point(5.0, DistanceBand::Near, 4.5, 3.0)], &m);
        let recs = RecommendationEngine::new().recommend(&r, &m);
        assert_eq!(recs[0].priority, Priority::High);
        assert!(!kinds(&recs).contains(&"balcony"));
        assert!(!kinds(&recs).contains(&"shape"));
    }

    #[test]
    fn test_small_violation_skips_height_and_far_setback() {
        let m = massing(Usage::Office, 4);
        let r = result(vec![point(20.0, DistanceBand::Far, 2.5, 2.0)], &m);
        let recs = RecommendationEngine::new().recommend(&r, &m);
        assert_eq!(kinds(&recs), vec!["floors", "shape"]);
    }

    #[test]
    fn test_single_floor_keeps_ground_floor() {
        let m = massing(Usage::Office, 1);
        let r = result(vec![point(5.0, DistanceBand::Near, 3.5, 3.0)], &m);
        let recs = RecommendationEngine::new().recommend(&r, &m);
        assert!(!kinds(&recs).contains(&"floors"));
    }
}
