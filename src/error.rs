//! Error types shared by the compliance pipeline.

use thiserror::Error;

/// Errors raised by the compliance engine and its building blocks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Site or request fields are missing or out of range.
    #[error("invalid input: {0}")]
    Input(String),
    /// Building parameters cannot produce a massing.
    #[error("invalid building parameters: {0}")]
    InvalidParameters(String),
    /// A polygon has fewer than 3 vertices or no area.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    /// A newer request replaced the one this run was started for.
    #[error("run superseded by a newer request (fingerprint {latest:016x})")]
    Superseded { latest: u64 },
    /// Unexpected failure inside a pipeline stage.
    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
