//! Per-run solve report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::problem::Problem;
use crate::solution::{CandidateSolution, SkippedCandidate};

/// What retrieval found for one run, for callers and logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalSummary {
    pub case_count: usize,
    pub policy_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_case_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_policy_score: Option<f64>,
}

/// The full outcome of one successful pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub run_id: Uuid,
    /// Input problem with the classifier-assigned category.
    pub problem: Problem,
    /// Candidates in final rank order (best first).
    pub ranked: Vec<CandidateSolution>,
    /// Candidates excluded from ranking, with reasons.
    pub skipped: Vec<SkippedCandidate>,
    pub retrieval: RetrievalSummary,
    pub elapsed_ms: u64,
    pub generated_at: DateTime<Utc>,
}

impl SolveReport {
    /// Best-ranked candidate, if any survived evaluation.
    pub fn best(&self) -> Option<&CandidateSolution> {
        self.ranked.first()
    }
}
