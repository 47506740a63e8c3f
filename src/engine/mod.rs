//! Compliance run orchestration.
//!
//! [`ComplianceEngine::check_compliance`] validates a [`ComplianceRequest`],
//! fingerprints it, consults the injected [`ResultCache`] and otherwise runs
//! the stage [`Pipeline`]: resolve regulation, generate massing, compute the
//! ephemeris, simulate shadows and derive recommendations.
//!
//! Error policy: invalid input, invalid building parameters and superseded
//! runs are returned as `Err`. Any other failure produces a non-compliant
//! result whose outcome records the failed stage; such results are never
//! cached.

use std::sync::Mutex;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sim::shadow::{ComplianceOutcome, ComplianceResult};
use crate::sim::solar::reference_winter_solstice;

pub mod bus;
pub mod cache;
pub mod config;
pub mod fingerprint;
pub mod request;
pub mod stage;
pub mod stages;
pub mod supersession;

pub use bus::Bus;
pub use cache::{InMemoryCache, NoCache, ResultCache};
pub use config::{EngineConfig, RecheckPolicy};
pub use fingerprint::fingerprint;
pub use request::ComplianceRequest;
pub use stage::{Pipeline, Stage, StageContext, StageFailure};
pub use supersession::{RunTicket, SupersessionGuard};

/// Last compliant full simulation, kept for the quick re-check policy.
#[derive(Debug, Clone)]
struct Baseline {
    request: ComplianceRequest,
    reference_date: NaiveDate,
    result: ComplianceResult,
}

/// Runs compliance checks against an injected result cache.
pub struct ComplianceEngine<C: ResultCache = InMemoryCache> {
    config: EngineConfig,
    cache: C,
    guard: SupersessionGuard,
    baseline: Mutex<Option<Baseline>>,
}

impl ComplianceEngine<InMemoryCache> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_cache(config, InMemoryCache::new())
    }
}

impl Default for ComplianceEngine<InMemoryCache> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<C: ResultCache> ComplianceEngine<C> {
    pub fn with_cache(config: EngineConfig, cache: C) -> Self {
        Self {
            config,
            cache,
            guard: SupersessionGuard::new(),
            baseline: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Guard shared with callers that want to supersede runs themselves.
    pub fn guard(&self) -> &SupersessionGuard {
        &self.guard
    }

    /// Default stage sequence.
    pub fn pipeline() -> Pipeline {
        Pipeline::new()
            .with_stage(stages::ResolveRegulation)
            .with_stage(stages::GenerateMassing)
            .with_stage(stages::ComputeEphemeris)
            .with_stage(stages::SimulateShadow)
            .with_stage(stages::Recommend)
    }

    /// Checks the request against the shadow regulation of its zone.
    pub fn check_compliance(&self, request: &ComplianceRequest) -> Result<ComplianceResult> {
        request.validate()?;

        let reference_date = match request.reference_date {
            Some(d) => d,
            None => reference_winter_solstice(Local::now().date_naive(), request.site.latitude)?,
        };
        let fp = fingerprint(request, reference_date)?;
        let ticket = self.guard.issue(fp);
        self.cache.retain_only(fp);

        if let Some(hit) = self.cache.get(fp) {
            if let Err(e) = ticket.check() {
                warn!(
                    "cache hit for superseded fingerprint {fp:016x} (latest {:016x})",
                    self.guard.latest_fingerprint()
                );
                return Err(e);
            }
            debug!("cache hit for {fp:016x}");
            return Ok(hit);
        }

        if let Some(result) = self.quick_recheck(request, reference_date, fp) {
            info!("run {fp:016x}: reused compliant result (quick re-check)");
            return Ok(result);
        }

        let t0 = Instant::now();
        let ctx = StageContext {
            request,
            config: &self.config,
            reference_date,
            ticket: &ticket,
        };
        let mut bus = Bus::new();
        let mut result = match Self::pipeline().run(&ctx, &mut bus) {
            Ok(()) => match bus.take::<ComplianceResult>() {
                Some(r) => r,
                None => ComplianceResult::failed("pipeline", "no result was produced"),
            },
            Err(failure) => match failure.into_error() {
                Error::Stage { stage, message } => {
                    warn!("run {fp:016x}: stage {stage} failed: {message}");
                    ComplianceResult::failed(stage, message)
                }
                e => return Err(e),
            },
        };
        result.reference_date = Some(reference_date);
        result.fingerprint = Some(fp);

        ticket.check()?;

        info!(
            "run {fp:016x}: {} ({} points, rate {:.1}%, {} recommendations) in {:.1} ms",
            outcome_label(&result),
            result.sample_points.len(),
            result.compliance_rate,
            result.recommendations.len(),
            t0.elapsed().as_secs_f64() * 1e3
        );

        if !result.is_failed() {
            self.cache.put(fp, result.clone());
            if result.is_compliant && result.outcome == ComplianceOutcome::Evaluated {
                *self.lock_baseline() = Some(Baseline {
                    request: request.clone(),
                    reference_date,
                    result: result.clone(),
                });
            }
        }
        Ok(result)
    }

    /// Reuses the last compliant result when the policy allows it.
    fn quick_recheck(
        &self,
        request: &ComplianceRequest,
        reference_date: NaiveDate,
        fp: u64,
    ) -> Option<ComplianceResult> {
        let RecheckPolicy::Quick {
            max_height_increase,
            max_area_increase_ratio,
        } = self.config.recheck
        else {
            return None;
        };
        let baseline = self.lock_baseline();
        let base = baseline.as_ref()?;

        let (old, new) = (&base.request, request);
        let same_context = base.reference_date == reference_date
            && old.site.latitude == new.site.latitude
            && old.site.longitude == new.site.longitude
            && old.zoning == new.zoning
            && old.floor_area_ratio == new.floor_area_ratio
            && old.overrides == new.overrides
            && old.neighbors == new.neighbors;
        let (ob, nb) = (&old.building, &new.building);
        let same_program = ob.usage == nb.usage
            && ob.structure == nb.structure
            && ob.floors == nb.floors
            && ob.unit_count == nb.unit_count;
        let minor_growth = nb.max_height - ob.max_height <= max_height_increase
            && nb.building_area <= ob.building_area * (1.0 + max_area_increase_ratio);

        if !(same_context && same_program && minor_growth) {
            return None;
        }
        let mut result = base.result.clone();
        result.fingerprint = Some(fp);
        result.quick_recheck = true;
        Some(result)
    }

    fn lock_baseline(&self) -> std::sync::MutexGuard<'_, Option<Baseline>> {
        self.baseline.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Convenience wrapper: one check with default configuration and no cache.
pub fn check_compliance(request: &ComplianceRequest) -> Result<ComplianceResult> {
    ComplianceEngine::with_cache(EngineConfig::default(), NoCache).check_compliance(request)
}

fn outcome_label(result: &ComplianceResult) -> &'static str {
    match (&result.outcome, result.is_compliant) {
        (ComplianceOutcome::Evaluated, true) => "compliant",
        (ComplianceOutcome::Evaluated, false) => "non-compliant",
        (ComplianceOutcome::NotSubject { .. }, _) => "not subject",
        (ComplianceOutcome::NotApplicable { .. }, _) => "not applicable",
        (ComplianceOutcome::Failed { .. }, _) => "failed",
    }
}
