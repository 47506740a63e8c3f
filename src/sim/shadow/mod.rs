//! Shadow compliance simulation on a sample grid around the building.

pub mod caster;
pub mod config;
pub mod grid;
pub mod result;
pub mod simulation;

pub use caster::{CasterKind, ShadowCaster, StepShadow};
pub use config::{ShadowConfig, ShadowModel};
pub use grid::{GridPoint, sample_grid};
pub use result::{
    ComplianceOutcome, ComplianceResult, CriticalFloor, DistanceBand, GeometryStats,
    ShadowSamplePoint, TimeStepSummary,
};
pub use simulation::ShadowSimulation;
