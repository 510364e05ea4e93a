//! Per-dimension scoring heuristics
//!
//! Each scorer is a pure function over the candidate and its problem,
//! returning a value in [0,1]. They are swappable behind
//! [`DimensionScorer`] so individual heuristics can be refined without
//! touching the engine.

use civicase_core::{CandidateSolution, Dimension, Problem};

/// A pluggable scoring heuristic for one dimension.
pub trait DimensionScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    /// Score in [0,1]. Implementations clamp their own output.
    fn score(&self, candidate: &CandidateSolution, problem: &Problem) -> f64;
}

/// The default scorer set, one per fixed dimension.
pub fn default_scorers() -> Vec<Box<dyn DimensionScorer>> {
    vec![
        Box::new(FeasibilityScorer),
        Box::new(ComplianceScorer),
        Box::new(EffectivenessScorer),
        Box::new(SustainabilityScorer),
    ]
}

/// Terms indicating a staged, structured plan.
const PLAN_MARKERS: [&str; 8] = [
    "第一", "阶段", "步骤", "分期", "step", "phase", "stage", "1.",
];

/// Terms indicating the solution thought about resources.
const RESOURCE_MARKERS: [&str; 9] = [
    "资金", "人员", "人手", "资源", "预算", "budget", "staff", "funding", "resource",
];

/// Terms indicating an ongoing mechanism rather than a one-off action.
const SUSTAIN_MARKERS: [&str; 14] = [
    "长效", "机制", "制度", "维护", "监督", "持续", "运营", "巡查", "maintenance",
    "monitoring", "funding", "ongoing", "long-term", "institution",
];

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

fn count_present(text: &str, markers: &[&str]) -> u32 {
    markers.iter().filter(|m| text.contains(*m)).count() as u32
}

/// Constraint pressure against complexity signals in the content.
///
/// Starts from a mid-high base; a structured plan and explicit resource
/// planning raise it, each stated constraint (budget/timeline count as
/// constraints) pushes it down.
pub struct FeasibilityScorer;

impl DimensionScorer for FeasibilityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Feasibility
    }

    fn score(&self, candidate: &CandidateSolution, problem: &Problem) -> f64 {
        let text = candidate.content.to_lowercase();

        let mut constraint_count = problem.constraints.len();
        if problem.budget_range.is_some() {
            constraint_count += 1;
        }
        if problem.timeline.is_some() {
            constraint_count += 1;
        }
        let pressure = (constraint_count as f64 * 0.1).min(0.5);

        let plan_signal = if contains_any(&text, &PLAN_MARKERS) { 0.2 } else { 0.0 };
        let resource_signal = if contains_any(&text, &RESOURCE_MARKERS) { 0.15 } else { 0.0 };

        (0.65 + plan_signal + resource_signal - pressure).clamp(0.0, 1.0)
    }
}

/// Supporting-policy presence and strength.
///
/// No supporting policies means 0. Otherwise the mean policy relevance,
/// scaled by coverage (capped at 3 clauses) and topped up by a bonus for
/// admin-level diversity.
pub struct ComplianceScorer;

impl DimensionScorer for ComplianceScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Compliance
    }

    fn score(&self, candidate: &CandidateSolution, _problem: &Problem) -> f64 {
        let policies = &candidate.supporting_policies;
        if policies.is_empty() {
            return 0.0;
        }

        let mean_relevance: f64 =
            policies.iter().map(|p| p.relevance_score).sum::<f64>() / policies.len() as f64;
        let coverage = (policies.len().min(3) as f64) / 3.0;

        let distinct_levels: std::collections::HashSet<_> =
            policies.iter().filter_map(|p| p.admin_level).collect();
        let diversity_bonus = (distinct_levels.len().saturating_sub(1) as f64 * 0.1).min(0.2);

        (mean_relevance * (0.5 + 0.5 * coverage) + diversity_bonus).clamp(0.0, 1.0)
    }
}

/// Token overlap between the solution content and the expected outcome.
///
/// 0.5 neutral when the problem states no expected outcome.
pub struct EffectivenessScorer;

impl DimensionScorer for EffectivenessScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Effectiveness
    }

    fn score(&self, candidate: &CandidateSolution, problem: &Problem) -> f64 {
        let outcome = problem.expected_outcome.trim();
        if outcome.is_empty() {
            return 0.5;
        }

        let content = candidate.content.to_lowercase();
        let terms = outcome_terms(&outcome.to_lowercase());
        if terms.is_empty() {
            return 0.5;
        }

        let matched = terms.iter().filter(|t| content.contains(t.as_str())).count();
        (matched as f64 / terms.len() as f64).clamp(0.0, 1.0)
    }
}

/// Split an expected outcome into matchable terms: ASCII words of three or
/// more characters, and CJK character bigrams.
fn outcome_terms(outcome: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    for word in outcome.split(|c: char| !c.is_alphanumeric()) {
        if word.is_ascii() && word.len() >= 3 {
            terms.push(word.to_string());
        }
    }

    let cjk: Vec<char> = outcome.chars().filter(|c| !c.is_ascii()).collect();
    for pair in cjk.windows(2) {
        terms.push(pair.iter().collect());
    }

    terms.sort();
    terms.dedup();
    terms
}

/// Presence of ongoing-mechanism markers, with diminishing returns per
/// additional marker.
pub struct SustainabilityScorer;

impl DimensionScorer for SustainabilityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Sustainability
    }

    fn score(&self, candidate: &CandidateSolution, _problem: &Problem) -> f64 {
        let text = candidate.content.to_lowercase();
        let hits = count_present(&text, &SUSTAIN_MARKERS);
        (1.0 - 0.6_f64.powi(hits as i32)).clamp(0.0, 1.0)
    }
}
