//! Concurrent batch orchestration
//!
//! Each problem runs in its own task under a shared semaphore, with a
//! per-item wall-clock timeout and a cooperative cancel token. One failed
//! item never aborts its siblings; outcomes come back in input order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use civicase_core::{
    BatchOutcome, BatchResult, EvaluationWeights, FailureRecord, Problem, SolveError,
};
use civicase_eval::EvaluationEngine;

use crate::cancel::CancelToken;
use crate::pipeline::Pipeline;

/// A batch of problems to solve. Weights, concurrency, and the per-item
/// timeout can be overridden per request; anything left `None` falls back
/// to the pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub problems: Vec<Problem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<EvaluationWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl BatchRequest {
    pub fn new(problems: Vec<Problem>) -> Self {
        BatchRequest {
            problems,
            weights: None,
            concurrency: None,
            timeout_ms: None,
        }
    }

    pub fn with_weights(mut self, weights: EvaluationWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

impl Pipeline {
    /// Solve every problem in the request concurrently.
    ///
    /// Returns `Err` only for request-level problems (invalid weight or
    /// concurrency override); per-item failures land in their slot as
    /// [`BatchOutcome::Failed`]. The result always has one outcome per
    /// input problem, in input order.
    pub async fn run_batch(
        self: Arc<Self>,
        request: BatchRequest,
        cancel: CancelToken,
    ) -> Result<BatchResult, SolveError> {
        let weights = request.weights.unwrap_or(self.config.weights);
        let engine = Arc::new(EvaluationEngine::new(weights)?);

        let concurrency = request.concurrency.unwrap_or(self.config.concurrency);
        if concurrency == 0 {
            return Err(SolveError::InvalidConfig(
                "batch concurrency must be at least 1".into(),
            ));
        }
        let timeout = request
            .timeout_ms
            .map(std::time::Duration::from_millis)
            .unwrap_or(self.config.per_item_timeout);

        let total = request.problems.len();
        if total == 0 {
            return Ok(BatchResult { outcomes: vec![] });
        }

        info!(total, concurrency, "batch started");

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut workers = JoinSet::new();

        for (index, problem) in request.problems.into_iter().enumerate() {
            let pipeline = Arc::clone(&self);
            let engine = Arc::clone(&engine);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            workers.spawn(async move {
                let outcome = pipeline
                    .run_slot(problem, &engine, semaphore, cancel, timeout)
                    .await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<BatchOutcome>> = vec![None; total];
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => error!(error = %e, "batch worker aborted"),
            }
        }

        // An aborted worker leaves its slot empty; report it as cancelled
        // so the outcome count still matches the input count.
        let outcomes: Vec<BatchOutcome> = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| BatchOutcome::Failed(FailureRecord::cancelled())))
            .collect();

        let result = BatchResult { outcomes };
        info!(
            total,
            succeeded = result.succeeded(),
            failed = result.failed(),
            "batch finished"
        );
        Ok(result)
    }

    /// One batch slot: wait for a permit, then solve under the per-item
    /// timeout, bailing out promptly on cancellation at either point.
    async fn run_slot(
        &self,
        problem: Problem,
        engine: &EvaluationEngine,
        semaphore: Arc<Semaphore>,
        cancel: CancelToken,
        timeout: std::time::Duration,
    ) -> BatchOutcome {
        let _permit = tokio::select! {
            permit = semaphore.acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return BatchOutcome::Failed(FailureRecord::cancelled()),
            },
            _ = cancel.cancelled() => return BatchOutcome::Failed(FailureRecord::cancelled()),
        };

        tokio::select! {
            bounded = tokio::time::timeout(timeout, self.solve_staged(problem, engine)) => {
                match bounded {
                    Ok(Ok(report)) => BatchOutcome::Solved(report),
                    Ok(Err(staged)) => BatchOutcome::Failed(FailureRecord::from_error(
                        Some(staged.stage),
                        &staged.error,
                    )),
                    Err(_) => BatchOutcome::Failed(FailureRecord::timed_out(timeout)),
                }
            }
            _ = cancel.cancelled() => BatchOutcome::Failed(FailureRecord::cancelled()),
        }
    }
}
