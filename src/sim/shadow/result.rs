use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::regulation::{Sourced, ZoneRegulation};
use crate::sim::recommend::Recommendation;

/// Distance band of a sample point, each with its own hour limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceBand {
    Near,
    Far,
}

impl DistanceBand {
    /// Classifies a boundary distance. The limit itself belongs to the near band.
    pub fn classify(distance: f64, near_limit: f64) -> Self {
        if distance <= near_limit {
            Self::Near
        } else {
            Self::Far
        }
    }

    /// Permitted shadow hours for this band.
    pub fn limit_hours(&self, regulation: &ZoneRegulation) -> f64 {
        match self {
            Self::Near => regulation.near_limit_hours,
            Self::Far => regulation.far_limit_hours,
        }
    }
}

/// One location on the measurement plane and its shadow exposure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowSamplePoint {
    pub position: Point,
    /// Distance to the nearest building boundary edge [m].
    pub distance: f64,
    pub band: DistanceBand,
    /// Shadow flag per time step, in table order.
    pub shadowed: Vec<bool>,
    pub shadow_hours: f64,
    pub limit_hours: f64,
    pub compliant: bool,
    /// Hours above the limit (0 when compliant).
    pub violation_hours: f64,
}

/// Per-step diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStepSummary {
    pub hour: f64,
    pub duration: f64,
    pub altitude: f64,
    pub azimuth: f64,
    /// Points in shadow at this step.
    pub shadowed_points: usize,
    /// Violating points that are in shadow at this step.
    pub violating_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalFloor {
    pub level: u32,
    pub elevation: f64,
    pub footprint_area: f64,
    /// Footprint area times elevation.
    pub impact_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Plan area of the elements casting above the measurement plane [m2].
    pub effective_footprint_area: f64,
    /// Volume of the massing above the measurement plane [m3].
    pub shadow_casting_volume: f64,
    /// Highest impact floors first, at most three.
    pub critical_floors: Vec<CriticalFloor>,
}

/// How the verdict was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ComplianceOutcome {
    /// The grid was simulated.
    Evaluated,
    /// The massing stays below the regulation's trigger thresholds.
    NotSubject { height: f64, floors: u32 },
    /// No shadow regulation applies to the zone.
    NotApplicable { reason: String },
    /// A pipeline stage failed; the result is conservatively non-compliant.
    Failed { stage: String, reason: String },
}

/// Outcome of a compliance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub outcome: ComplianceOutcome,
    pub is_compliant: bool,
    pub regulation: Option<Sourced<ZoneRegulation>>,
    pub reference_date: Option<NaiveDate>,
    /// Fingerprint of the request this result answers.
    pub fingerprint: Option<u64>,
    pub sample_points: Vec<ShadowSamplePoint>,
    pub time_steps: Vec<TimeStepSummary>,
    /// Hour with the most violating points in shadow.
    pub peak_violation_time: Option<f64>,
    /// Hour with the fewest violating points in shadow.
    pub best_compliance_time: Option<f64>,
    pub stats: GeometryStats,
    /// Share of compliant sample points, 0-100. It is 100 exactly when no
    /// point violates, except for failed runs, which report 0 with no points
    /// so a failure never reads as compliant.
    pub compliance_rate: f64,
    pub violating_points: usize,
    pub max_violation_hours: f64,
    /// Violating point count times cell area [m2].
    pub violation_area: f64,
    pub recommendations: Vec<Recommendation>,
    /// Reused from a previous compliant run without resimulating.
    #[serde(default)]
    pub quick_recheck: bool,
}

impl ComplianceResult {
    fn empty(outcome: ComplianceOutcome, is_compliant: bool) -> Self {
        Self {
            outcome,
            is_compliant,
            regulation: None,
            reference_date: None,
            fingerprint: None,
            sample_points: Vec::new(),
            time_steps: Vec::new(),
            peak_violation_time: None,
            best_compliance_time: None,
            stats: GeometryStats::default(),
            compliance_rate: if is_compliant { 100.0 } else { 0.0 },
            violating_points: 0,
            max_violation_hours: 0.0,
            violation_area: 0.0,
            recommendations: Vec::new(),
            quick_recheck: false,
        }
    }

    /// Compliant result for a massing below the regulation's trigger.
    pub fn not_subject(height: f64, floors: u32) -> Self {
        Self::empty(ComplianceOutcome::NotSubject { height, floors }, true)
    }

    /// Compliant result for a zone without shadow regulation.
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self::empty(
            ComplianceOutcome::NotApplicable {
                reason: reason.into(),
            },
            true,
        )
    }

    /// Non-compliant result recording a stage failure.
    pub fn failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::empty(
            ComplianceOutcome::Failed {
                stage: stage.into(),
                reason: reason.into(),
            },
            false,
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ComplianceOutcome::Failed { .. })
    }

    pub fn violations(&self) -> impl Iterator<Item = &ShadowSamplePoint> {
        self.sample_points.iter().filter(|p| !p.compliant)
    }

    /// Mean violation hours over violating points (0 if there are none).
    pub fn mean_violation_hours(&self) -> f64 {
        let (sum, n) = self
            .violations()
            .fold((0.0, 0usize), |(s, n), p| (s + p.violation_hours, n + 1));
        if n == 0 { 0.0 } else { sum / n as f64 }
    }

    /// Sample point count per band.
    pub fn band_counts(&self) -> (usize, usize) {
        self.sample_points
            .iter()
            .fold((0, 0), |(near, far), p| match p.band {
                DistanceBand::Near => (near + 1, far),
                DistanceBand::Far => (near, far + 1),
            })
    }
}
