//! Weighted aggregation and ranking of candidate solutions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use civicase_core::{
    CandidateSolution, EvaluationWeights, Problem, SkippedCandidate, SolveError,
};

use crate::scorers::{default_scorers, DimensionScorer};

/// Result of evaluating a batch of candidates: scored solutions in rank
/// order, plus candidates that could not be scored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RankedSolutions {
    pub ranked: Vec<CandidateSolution>,
    pub skipped: Vec<SkippedCandidate>,
}

/// Scores candidates on every dimension and ranks them by weighted
/// aggregate.
pub struct EvaluationEngine {
    scorers: Vec<Box<dyn DimensionScorer>>,
    weights: EvaluationWeights,
}

impl EvaluationEngine {
    /// Build an engine with the default scorer set. Rejects weights that
    /// are not a valid convex combination.
    pub fn new(weights: EvaluationWeights) -> Result<Self, SolveError> {
        weights.validate()?;
        Ok(Self {
            scorers: default_scorers(),
            weights,
        })
    }

    pub fn weights(&self) -> EvaluationWeights {
        self.weights
    }

    /// Score one candidate across all dimensions and compute its
    /// aggregate. Candidates with blank content cannot be judged and are
    /// reported as skipped rather than failing the run.
    pub fn evaluate(
        &self,
        mut candidate: CandidateSolution,
        problem: &Problem,
    ) -> Result<CandidateSolution, SkippedCandidate> {
        if candidate.content.trim().is_empty() {
            return Err(SkippedCandidate {
                ordinal: candidate.ordinal,
                reason: "candidate content is empty".to_string(),
            });
        }

        let mut aggregate = 0.0;
        for scorer in &self.scorers {
            let dim = scorer.dimension();
            let score = scorer.score(&candidate, problem).clamp(0.0, 1.0);
            aggregate += self.weights.get(dim) * score;
            candidate.scores.insert(dim, score);
        }
        candidate.aggregate_score = Some(aggregate.clamp(0.0, 1.0));

        debug!(
            ordinal = candidate.ordinal,
            aggregate = candidate.aggregate_score,
            "candidate scored"
        );
        Ok(candidate)
    }

    /// Evaluate all candidates and rank them: aggregate descending, then
    /// feasibility descending. The sort is stable, so candidates that tie
    /// on both keys keep their creation order.
    pub fn evaluate_all(
        &self,
        candidates: Vec<CandidateSolution>,
        problem: &Problem,
    ) -> RankedSolutions {
        let mut out = RankedSolutions::default();
        for candidate in candidates {
            match self.evaluate(candidate, problem) {
                Ok(scored) => out.ranked.push(scored),
                Err(skipped) => out.skipped.push(skipped),
            }
        }

        out.ranked.sort_by(|a, b| {
            let agg = b
                .aggregate_score
                .partial_cmp(&a.aggregate_score)
                .unwrap_or(std::cmp::Ordering::Equal);
            agg.then_with(|| {
                let fa = a.score(civicase_core::Dimension::Feasibility).unwrap_or(0.0);
                let fb = b.score(civicase_core::Dimension::Feasibility).unwrap_or(0.0);
                fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        out
    }
}
