//! Pipeline configuration with environment overrides
//!
//! Defaults match the documented pipeline contract; every knob can be
//! overridden with a `CIVICASE_*` environment variable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::weights::EvaluationWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Cases requested per run.
    pub k_cases: usize,
    /// Policy clauses requested per run.
    pub k_policies: usize,
    /// Items scoring below this are dropped by retrieval.
    pub min_relevance: f64,
    /// Candidate solutions requested per run.
    pub n_candidates: usize,
    /// Additional generation attempts after the first.
    pub max_generation_retries: u32,
    /// Per-item wall-clock bound in batch mode.
    pub per_item_timeout: Duration,
    /// Batch worker bound.
    pub concurrency: usize,
    pub weights: EvaluationWeights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            k_cases: 5,
            k_policies: 5,
            min_relevance: 0.3,
            n_candidates: 1,
            max_generation_retries: 2,
            per_item_timeout: Duration::from_secs(30),
            concurrency: default_concurrency(),
            weights: EvaluationWeights::default(),
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl PipelineConfig {
    /// Defaults overlaid with any `CIVICASE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = PipelineConfig::default();

        if let Some(v) = env_parse::<usize>("CIVICASE_K_CASES") {
            config.k_cases = v;
        }
        if let Some(v) = env_parse::<usize>("CIVICASE_K_POLICIES") {
            config.k_policies = v;
        }
        if let Some(v) = env_parse::<f64>("CIVICASE_MIN_RELEVANCE") {
            config.min_relevance = v;
        }
        if let Some(v) = env_parse::<usize>("CIVICASE_N_CANDIDATES") {
            config.n_candidates = v;
        }
        if let Some(v) = env_parse::<u32>("CIVICASE_GENERATION_RETRIES") {
            config.max_generation_retries = v;
        }
        if let Some(v) = env_parse::<u64>("CIVICASE_ITEM_TIMEOUT_MS") {
            config.per_item_timeout = Duration::from_millis(v);
        }
        if let Some(v) = env_parse::<usize>("CIVICASE_CONCURRENCY") {
            config.concurrency = v;
        }

        config
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        self.weights.validate()?;
        if self.concurrency == 0 {
            return Err(SolveError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.k_cases, 5);
        assert!((config.min_relevance - 0.3).abs() < f64::EPSILON);
        assert!(config.concurrency >= 1);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = PipelineConfig {
            concurrency: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
