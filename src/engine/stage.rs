use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use log::debug;

use super::bus::Bus;
use super::config::EngineConfig;
use super::request::ComplianceRequest;
use super::supersession::RunTicket;
use crate::error::Error;

/// Read-only inputs shared by all stages of one run.
pub struct StageContext<'a> {
    pub request: &'a ComplianceRequest,
    pub config: &'a EngineConfig,
    pub reference_date: NaiveDate,
    pub ticket: &'a RunTicket,
}

/// One step of a compliance run. Stages communicate through the [`Bus`].
pub trait Stage {
    /// Identifier used in logs and failure reports.
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &StageContext, bus: &mut Bus) -> Result<()>;
}

/// A stage error together with the stage it came from.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: &'static str,
    pub error: anyhow::Error,
}

impl StageFailure {
    /// Converts into a typed error. Input, parameter and supersession errors
    /// pass through unchanged; anything else becomes [`Error::Stage`].
    pub fn into_error(self) -> Error {
        match self.error.downcast::<Error>() {
            Ok(e @ (Error::Input(_) | Error::InvalidParameters(_) | Error::Superseded { .. })) => e,
            Ok(e) => Error::Stage {
                stage: self.stage.to_string(),
                message: e.to_string(),
            },
            Err(other) => Error::Stage {
                stage: self.stage.to_string(),
                message: format!("{other:#}"),
            },
        }
    }
}

/// Executes stages in order, stopping at the first failure.
///
/// The run ticket is checked before every stage, so a superseded run stops
/// early instead of finishing work nobody will read.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: vec![] }
    }

    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn run(&self, ctx: &StageContext, bus: &mut Bus) -> std::result::Result<(), StageFailure> {
        for stage in &self.stages {
            let fail = |error: anyhow::Error| StageFailure {
                stage: stage.name(),
                error,
            };
            ctx.ticket.check().map_err(|e| fail(e.into()))?;

            let t0 = Instant::now();
            match panic::catch_unwind(AssertUnwindSafe(|| stage.run(ctx, bus))) {
                Ok(outcome) => outcome.map_err(fail)?,
                Err(payload) => {
                    return Err(fail(anyhow!("panicked: {}", panic_message(payload.as_ref()))));
                }
            }
            debug!(
                "stage {} done in {:.2} ms",
                stage.name(),
                t0.elapsed().as_secs_f64() * 1e3
            );
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
