//! civicase-eval: multi-dimensional evaluation and ranking
//!
//! Scores candidate solutions on four fixed dimensions (feasibility,
//! compliance, effectiveness, sustainability), aggregates them under a
//! validated weight vector and ranks the result deterministically.

pub mod engine;
pub mod scorers;

pub use engine::{EvaluationEngine, RankedSolutions};
pub use scorers::{
    default_scorers, ComplianceScorer, DimensionScorer, EffectivenessScorer, FeasibilityScorer,
    SustainabilityScorer,
};
