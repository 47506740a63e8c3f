//! Shadow-regulation thresholds per zoning classification.

use serde::{Deserialize, Serialize};

pub mod config;
pub mod resolver;
pub mod zone;

pub use config::RegulationConfig;
pub use resolver::RegulationResolver;
pub use zone::ZoneClass;

/// Daily window during which shadows are counted [h, true solar time].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl TimeWindow {
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end_hour - self.start_hour).max(0.0)
    }

    pub fn contains(&self, hour: f64) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }
}

/// Which buildings fall under the regulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectThreshold {
    /// Buildings strictly taller than this are regulated [m].
    pub height_above: f64,
    /// Buildings with at least this many floors are regulated.
    pub floors_at_least: Option<u32>,
}

impl SubjectThreshold {
    pub fn applies_to(&self, height: f64, floors: u32) -> bool {
        height > self.height_above || self.floors_at_least.is_some_and(|f| floors >= f)
    }
}

/// Resolved shadow-regulation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRegulation {
    pub zone_name: String,
    pub zone_class: ZoneClass,
    pub subject: SubjectThreshold,
    /// Height of the plane on which shadows are measured [m].
    pub measurement_height: f64,
    pub window: TimeWindow,
    /// Limit within the near band (up to 10 m from the boundary) [h].
    pub near_limit_hours: f64,
    /// Limit in the far band (beyond 10 m) [h].
    pub far_limit_hours: f64,
    /// True if confirmed override values replaced computed defaults.
    #[serde(default)]
    pub overridden: bool,
}

impl ZoneRegulation {
    pub fn is_subject(&self, height: f64, floors: u32) -> bool {
        self.subject.applies_to(height, floors)
    }
}

/// Previously confirmed values for a project, preferred over table defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulationOverrides {
    pub measurement_height: Option<f64>,
    pub near_limit_hours: Option<f64>,
    pub far_limit_hours: Option<f64>,
    /// Free-text description of the regulated building class, display-only.
    pub target_building: Option<String>,
}

impl RegulationOverrides {
    pub fn is_empty(&self) -> bool {
        self.measurement_height.is_none()
            && self.near_limit_hours.is_none()
            && self.far_limit_hours.is_none()
    }
}

/// Neighboring parcel supplied by the zoning lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborParcel {
    pub zone: String,
    /// Floor-area ratio [%].
    pub floor_area_ratio: f64,
    /// Distance from the site [m].
    pub distance: f64,
}

/// A value tagged with how it was obtained.
///
/// Preference order: `Primary` (table hit) over `Borrowed` (adopted from a
/// neighboring parcel) over `Fallback` (conservative default). Values from
/// different tiers are never mixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sourced<T> {
    Primary(T),
    Borrowed { value: T, neighbor: NeighborParcel },
    Fallback { value: T, reason: String },
}

impl<T> Sourced<T> {
    pub fn value(&self) -> &T {
        match self {
            Sourced::Primary(v) => v,
            Sourced::Borrowed { value, .. } => value,
            Sourced::Fallback { value, .. } => value,
        }
    }

    /// Degraded confidence: the value is a conservative stand-in.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Sourced::Fallback { .. })
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Sourced::Borrowed { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Sourced::Primary(v) => Sourced::Primary(f(v)),
            Sourced::Borrowed { value, neighbor } => Sourced::Borrowed {
                value: f(value),
                neighbor,
            },
            Sourced::Fallback { value, reason } => Sourced::Fallback {
                value: f(value),
                reason,
            },
        }
    }
}

/// Result of regulation resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegulationOutcome {
    Regulated(Sourced<ZoneRegulation>),
    /// The zone carries no shadow regulation of its own.
    NotApplicable { zone_name: String, reason: String },
}

impl RegulationOutcome {
    pub fn regulation(&self) -> Option<&ZoneRegulation> {
        match self {
            RegulationOutcome::Regulated(s) => Some(s.value()),
            RegulationOutcome::NotApplicable { .. } => None,
        }
    }
}
