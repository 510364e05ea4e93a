//! Governance problem records and the category taxonomy

use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// Closed set of governance-problem categories.
///
/// Declaration order doubles as the tie-break priority used by the
/// classifier: when two categories score the same, the one declared
/// first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NeighborDispute,
    CommunityService,
    EnvironmentGovernance,
    SafetyManagement,
    PolicyPromotion,
    ElderCare,
    ParkingManagement,
    DigitalDivide,
    /// Fallback when no category clears the classification threshold.
    General,
}

impl Category {
    /// All categories in priority order.
    pub const ALL: [Category; 9] = [
        Category::NeighborDispute,
        Category::CommunityService,
        Category::EnvironmentGovernance,
        Category::SafetyManagement,
        Category::PolicyPromotion,
        Category::ElderCare,
        Category::ParkingManagement,
        Category::DigitalDivide,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NeighborDispute => "neighbor_dispute",
            Category::CommunityService => "community_service",
            Category::EnvironmentGovernance => "environment_governance",
            Category::SafetyManagement => "safety_management",
            Category::PolicyPromotion => "policy_promotion",
            Category::ElderCare => "elder_care",
            Category::ParkingManagement => "parking_management",
            Category::DigitalDivide => "digital_divide",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Administrative level a policy clause was issued at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    Central,
    Provincial,
    Municipal,
    County,
    Street,
}

impl AdminLevel {
    pub fn parse(s: &str) -> Option<AdminLevel> {
        match s.trim().to_ascii_lowercase().as_str() {
            "central" | "中央" => Some(AdminLevel::Central),
            "provincial" | "省级" => Some(AdminLevel::Provincial),
            "municipal" | "市级" => Some(AdminLevel::Municipal),
            "county" | "区县" => Some(AdminLevel::County),
            "street" | "街道社区" | "街道" => Some(AdminLevel::Street),
            _ => None,
        }
    }
}

/// A stated governance problem.
///
/// Immutable after classification except for `category`, which the
/// classifier assigns exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub description: String,
    pub location: String,
    /// 1 (routine) to 5 (most urgent).
    pub urgency_level: u8,
    pub stakeholders: Vec<String>,
    pub constraints: Vec<String>,
    pub expected_outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    /// Assigned by the classifier; `None` until classification runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Problem {
    pub fn new(description: impl Into<String>, location: impl Into<String>) -> Self {
        Problem {
            description: description.into(),
            location: location.into(),
            urgency_level: 3,
            stakeholders: Vec::new(),
            constraints: Vec::new(),
            expected_outcome: String::new(),
            timeline: None,
            budget_range: None,
            category: None,
        }
    }

    pub fn with_urgency(mut self, level: u8) -> Self {
        self.urgency_level = level;
        self
    }

    pub fn with_stakeholders(mut self, stakeholders: Vec<String>) -> Self {
        self.stakeholders = stakeholders;
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<String>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_expected_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.expected_outcome = outcome.into();
        self
    }

    /// Fail-fast intake validation. The intake surface is expected to have
    /// checked this already; the pipeline re-checks and rejects rather than
    /// classifying garbage.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.description.trim().is_empty() {
            return Err(SolveError::InvalidProblem("description is empty".into()));
        }
        if !(1..=5).contains(&self.urgency_level) {
            return Err(SolveError::InvalidProblem(format!(
                "urgency_level {} outside 1-5",
                self.urgency_level
            )));
        }
        Ok(())
    }

    /// Assign the category. Returns `false` (and leaves the existing value)
    /// if a category was already assigned.
    pub fn assign_category(&mut self, category: Category) -> bool {
        if self.category.is_some() {
            return false;
        }
        self.category = Some(category);
        true
    }
}
