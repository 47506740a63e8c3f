//! The stages of a compliance run, in execution order.

use anyhow::{Result, bail};

use super::bus::Bus;
use super::stage::{Stage, StageContext};
use crate::massing::{BuildingMassing, MassingGenerator};
use crate::regulation::{RegulationOutcome, RegulationResolver};
use crate::sim::recommend::RecommendationEngine;
use crate::sim::shadow::{ComplianceResult, ShadowSimulation};
use crate::sim::solar::SolarTable;

/// Puts the [`RegulationOutcome`] on the Bus.
pub struct ResolveRegulation;

impl Stage for ResolveRegulation {
    fn name(&self) -> &'static str {
        "resolve-regulation"
    }

    fn run(&self, ctx: &StageContext, bus: &mut Bus) -> Result<()> {
        let request = ctx.request;
        let resolver = RegulationResolver::new(ctx.config.regulation.clone());
        let outcome = resolver.resolve(
            &request.zoning,
            request.floor_area_ratio,
            request.overrides.as_ref(),
            &request.neighbors,
        )?;
        bus.put(self.name(), outcome);
        Ok(())
    }
}

/// Puts the [`BuildingMassing`] on the Bus.
pub struct GenerateMassing;

impl Stage for GenerateMassing {
    fn name(&self) -> &'static str {
        "generate-massing"
    }

    fn run(&self, ctx: &StageContext, bus: &mut Bus) -> Result<()> {
        let generator = MassingGenerator::new(ctx.config.massing.clone());
        let massing = generator.generate(&ctx.request.building, Some(&ctx.request.site))?;
        bus.put(self.name(), massing);
        Ok(())
    }
}

/// Puts the [`SolarTable`] for the regulated window on the Bus.
///
/// Skipped when no regulation applies.
pub struct ComputeEphemeris;

impl Stage for ComputeEphemeris {
    fn name(&self) -> &'static str {
        "compute-ephemeris"
    }

    fn run(&self, ctx: &StageContext, bus: &mut Bus) -> Result<()> {
        let outcome = bus.require::<RegulationOutcome>(self.name())?;
        let Some(regulation) = outcome.regulation() else {
            return Ok(());
        };
        let table = SolarTable::compute(
            &ctx.request.site,
            ctx.reference_date,
            &regulation.window,
            &ctx.config.ephemeris,
        )?;
        bus.put(self.name(), table);
        Ok(())
    }
}

/// Puts the [`ComplianceResult`] on the Bus.
pub struct SimulateShadow;

impl Stage for SimulateShadow {
    fn name(&self) -> &'static str {
        "simulate-shadow"
    }

    fn run(&self, ctx: &StageContext, bus: &mut Bus) -> Result<()> {
        let outcome = bus.require::<RegulationOutcome>(self.name())?;
        let result = match outcome {
            RegulationOutcome::NotApplicable { reason, .. } => {
                ComplianceResult::not_applicable(reason.clone())
            }
            RegulationOutcome::Regulated(sourced) => {
                let massing = bus.require::<BuildingMassing>(self.name())?;
                let table = bus.require::<SolarTable>(self.name())?;
                let mut result = ShadowSimulation::new(
                    massing,
                    sourced.value(),
                    table,
                    ctx.config.shadow.clone(),
                )
                .run()?;
                result.regulation = Some(sourced.clone());
                result
            }
        };
        bus.put(self.name(), result);
        Ok(())
    }
}

/// Attaches recommendations to the [`ComplianceResult`] on the Bus.
pub struct Recommend;

impl Stage for Recommend {
    fn name(&self) -> &'static str {
        "recommend"
    }

    fn run(&self, _ctx: &StageContext, bus: &mut Bus) -> Result<()> {
        let Some(mut result) = bus.take::<ComplianceResult>() else {
            bail!("{} requires ComplianceResult on the Bus", self.name());
        };
        let massing = bus.require::<BuildingMassing>(self.name())?;
        result.recommendations = RecommendationEngine::new().recommend(&result, massing);
        bus.put(self.name(), result);
        Ok(())
    }
}
