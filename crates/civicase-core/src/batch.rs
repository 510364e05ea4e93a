//! Batch outcome records
//!
//! One `BatchOutcome` per input problem, in input order. Failed slots carry
//! the same failure kinds a single-problem caller would see, so callers can
//! distinguish partial from total failure by scanning the sequence.

use serde::{Deserialize, Serialize};

use crate::error::{SolveError, Stage};
use crate::report::SolveReport;

/// Serializable mirror of the [`SolveError`] taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidProblem,
    InvalidWeights,
    InvalidConfig,
    RetrievalUnavailable,
    SynthesisFailed,
    TimedOut,
    Cancelled,
}

impl From<&SolveError> for ErrorKind {
    fn from(error: &SolveError) -> Self {
        match error {
            SolveError::InvalidProblem(_) => ErrorKind::InvalidProblem,
            SolveError::InvalidWeights(_) => ErrorKind::InvalidWeights,
            SolveError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            SolveError::RetrievalUnavailable(_) => ErrorKind::RetrievalUnavailable,
            SolveError::SynthesisFailed { .. } => ErrorKind::SynthesisFailed,
            SolveError::TimedOut(_) => ErrorKind::TimedOut,
            SolveError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Why one batch slot failed.
///
/// `stage` is `None` for run-level failures (timeout, cancellation) that
/// are not attributable to a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub kind: ErrorKind,
    pub message: String,
}

impl FailureRecord {
    pub fn from_error(stage: Option<Stage>, error: &SolveError) -> Self {
        FailureRecord {
            stage,
            kind: ErrorKind::from(error),
            message: error.to_string(),
        }
    }

    pub fn timed_out(timeout: std::time::Duration) -> Self {
        FailureRecord::from_error(None, &SolveError::TimedOut(timeout))
    }

    pub fn cancelled() -> Self {
        FailureRecord::from_error(None, &SolveError::Cancelled)
    }
}

/// One slot of a batch result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Solved(SolveReport),
    Failed(FailureRecord),
}

impl BatchOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, BatchOutcome::Solved(_))
    }

    pub fn failure(&self) -> Option<&FailureRecord> {
        match self {
            BatchOutcome::Failed(record) => Some(record),
            BatchOutcome::Solved(_) => None,
        }
    }
}

/// Ordered per-problem outcomes. Length always equals the number of input
/// problems, in input order, regardless of completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_solved()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_mirrors_taxonomy() {
        let error = SolveError::RetrievalUnavailable("connection refused".into());
        assert_eq!(ErrorKind::from(&error), ErrorKind::RetrievalUnavailable);

        let record = FailureRecord::from_error(Some(Stage::Retrieve), &error);
        assert_eq!(record.stage, Some(Stage::Retrieve));
        assert!(record.message.contains("connection refused"));
    }

    #[test]
    fn run_level_failures_have_no_stage() {
        let record = FailureRecord::timed_out(std::time::Duration::from_secs(30));
        assert_eq!(record.stage, None);
        assert_eq!(record.kind, ErrorKind::TimedOut);

        assert_eq!(FailureRecord::cancelled().kind, ErrorKind::Cancelled);
    }
}
