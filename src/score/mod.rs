//! Scoring backends.
//!
//! One seam, two implementations:
//!
//! - [`local::LocalScorer`]: in-process logistic model artifact, loaded once
//!   at construction (load failure is fatal at startup, never per request)
//! - [`remote::RemoteScorer`]: blocking HTTP POST to a scoring endpoint, with
//!   transport failures surfaced as recoverable per-call errors
//!
//! Both return exactly a probability of default and a binary class; neither
//! may abort the caller on a malformed single input, which is what lets the
//! batch orchestrator absorb failures row by row.

pub mod local;
pub mod remote;

pub use local::LocalScorer;
pub use remote::RemoteScorer;

use crate::domain::{EngineeredRecord, Prediction, RunConfig, ScorerChoice};
use crate::error::AppError;

/// A recoverable scoring failure for a single record.
///
/// Unlike [`AppError`], these are values the batch orchestrator threads into
/// the affected row's output rather than propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// Timeout, connection failure, or non-200 response.
    Transport(String),
    /// The backend answered, but with something unusable (bad JSON,
    /// out-of-range probability).
    Invalid(String),
}

impl ScoreError {
    pub fn message(&self) -> &str {
        match self {
            ScoreError::Transport(m) | ScoreError::Invalid(m) => m,
        }
    }
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ScoreError {}

/// Capability: produce a PD and class from an engineered record.
pub trait Scorer {
    fn score(&self, record: &EngineeredRecord) -> Result<Prediction, ScoreError>;

    /// Short human-readable backend description for reports.
    fn describe(&self) -> String;
}

/// Build the configured scoring backend.
///
/// Artifact-load failures surface here, at startup, with exit code 4.
pub fn build_scorer(config: &RunConfig) -> Result<Box<dyn Scorer>, AppError> {
    match &config.scorer {
        ScorerChoice::Local(path) => Ok(Box::new(LocalScorer::from_file(path)?)),
        ScorerChoice::Remote(url) => Ok(Box::new(RemoteScorer::new(url.clone(), config.asof_date)?)),
    }
}

/// Reject probabilities a model must never emit.
///
/// Shared by both backends so a rogue artifact and a rogue endpoint fail the
/// same way.
pub(crate) fn validate_pd(pd: f64, source: &str) -> Result<f64, ScoreError> {
    if !pd.is_finite() || !(0.0..=1.0).contains(&pd) {
        return Err(ScoreError::Invalid(format!(
            "{source} returned an invalid probability of default: {pd}"
        )));
    }
    Ok(pd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_pd_accepts_unit_interval() {
        assert_eq!(validate_pd(0.0, "model").unwrap(), 0.0);
        assert_eq!(validate_pd(1.0, "model").unwrap(), 1.0);
        assert_eq!(validate_pd(0.37, "model").unwrap(), 0.37);
    }

    #[test]
    fn validate_pd_rejects_rogue_values() {
        assert!(validate_pd(-0.01, "model").is_err());
        assert!(validate_pd(1.01, "model").is_err());
        assert!(validate_pd(f64::NAN, "api").is_err());
        assert!(validate_pd(f64::INFINITY, "api").is_err());
    }
}
