//! Unified error taxonomy for the solution pipeline
//!
//! Single-problem failures surface to the caller as a typed [`SolveError`].
//! In batch mode the orchestrator converts them into per-slot
//! [`crate::batch::FailureRecord`]s instead of propagating.

use std::time::Duration;
use thiserror::Error;

/// Pipeline stages, used to tag where a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Classify,
    Retrieve,
    Synthesize,
    Evaluate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Stage::Classify => write!(f, "classify"),
            Stage::Retrieve => write!(f, "retrieve"),
            Stage::Synthesize => write!(f, "synthesize"),
            Stage::Evaluate => write!(f, "evaluate"),
        }
    }
}

/// Why a generation call ultimately failed.
///
/// Empty responses and transport errors feed the same `SynthesisFailed`
/// kind but stay distinguishable for callers and logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisCause {
    #[error("generation transport error: {0}")]
    Transport(String),

    #[error("generator returned no usable content")]
    Empty,
}

/// Error taxonomy for one pipeline run.
#[derive(Error, Debug)]
pub enum SolveError {
    /// Malformed input. Caller error, never retried by the pipeline.
    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    /// Weight configuration rejected before any work starts.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// Non-weight configuration rejected before any work starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The semantic index could not be reached. Distinct from an empty
    /// result set, which is not an error.
    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// Generation exhausted its retry budget.
    #[error("synthesis failed after {attempts} attempt(s): {cause}")]
    SynthesisFailed { attempts: u32, cause: SynthesisCause },

    /// Per-item timeout elapsed. Recorded in batch mode, surfaced directly
    /// for single-problem calls.
    #[error("pipeline run timed out after {0:?}")]
    TimedOut(Duration),

    /// The enclosing batch was cancelled before this run finished.
    #[error("run cancelled")]
    Cancelled,
}
