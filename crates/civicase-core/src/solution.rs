//! Candidate solutions and evaluation dimensions

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::retrieved::{Case, PolicyClause};

/// The four fixed evaluation dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Feasibility,
    Compliance,
    Effectiveness,
    Sustainability,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Feasibility,
        Dimension::Compliance,
        Dimension::Effectiveness,
        Dimension::Sustainability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Feasibility => "feasibility",
            Dimension::Compliance => "compliance",
            Dimension::Effectiveness => "effectiveness",
            Dimension::Sustainability => "sustainability",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One generated proposal addressing a problem.
///
/// Created by the synthesizer with full attribution to the retrieved items
/// that were in its generation context, scored once by the evaluation
/// engine, and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSolution {
    pub id: Uuid,
    /// Creation order within one synthesis call; final ranking tie-break.
    pub ordinal: usize,
    pub content: String,
    pub supporting_cases: Vec<Case>,
    pub supporting_policies: Vec<PolicyClause>,
    /// Per-dimension scores in [0,1], populated by the evaluation engine.
    pub scores: BTreeMap<Dimension, f64>,
    /// Weighted sum of `scores`; `None` until evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl CandidateSolution {
    pub fn new(
        ordinal: usize,
        content: impl Into<String>,
        supporting_cases: Vec<Case>,
        supporting_policies: Vec<PolicyClause>,
    ) -> Self {
        CandidateSolution {
            id: Uuid::new_v4(),
            ordinal,
            content: content.into(),
            supporting_cases,
            supporting_policies,
            scores: BTreeMap::new(),
            aggregate_score: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_scored(&self) -> bool {
        self.aggregate_score.is_some()
    }

    pub fn score(&self, dimension: Dimension) -> Option<f64> {
        self.scores.get(&dimension).copied()
    }
}

/// A candidate the evaluation engine declined to score.
///
/// Excluded from ranking but reported to the caller; does not fail the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCandidate {
    pub ordinal: usize,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_candidate_is_unscored() {
        let candidate = CandidateSolution::new(0, "组织志愿者上门帮扶", vec![], vec![]);
        assert!(!candidate.is_scored());
        assert!(candidate.score(Dimension::Feasibility).is_none());
    }

    #[test]
    fn dimension_serializes_lowercase() {
        let json = serde_json::to_string(&Dimension::Sustainability).unwrap();
        assert_eq!(json, "\"sustainability\"");
    }
}
