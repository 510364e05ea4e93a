//! Items returned by retrieval: precedent cases and policy clauses
//!
//! Owned by one pipeline run's result set; never persisted by the core.

use serde::{Deserialize, Serialize};

use crate::problem::AdminLevel;

/// Where a retrieved item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Case,
    Policy,
}

/// A documented precedent: how a similar problem was previously resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub source_id: String,
    pub text_excerpt: String,
    /// Similarity to the query, 0.0 to 1.0, produced by the index.
    pub relevance_score: f64,
    pub outcome_summary: String,
    /// Concrete measures taken, bounded at 5 entries.
    pub key_measures: Vec<String>,
}

/// An excerpt of regulatory or policy text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyClause {
    pub source_id: String,
    pub text_excerpt: String,
    pub relevance_score: f64,
    pub citation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_level: Option<AdminLevel>,
}

/// Either kind of retrieved item, for callers that treat them uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum RetrievedItem {
    Case(Case),
    Policy(PolicyClause),
}

impl RetrievedItem {
    pub fn source_id(&self) -> &str {
        match self {
            RetrievedItem::Case(c) => &c.source_id,
            RetrievedItem::Policy(p) => &p.source_id,
        }
    }

    pub fn relevance_score(&self) -> f64 {
        match self {
            RetrievedItem::Case(c) => c.relevance_score,
            RetrievedItem::Policy(p) => p.relevance_score,
        }
    }

    pub fn text_excerpt(&self) -> &str {
        match self {
            RetrievedItem::Case(c) => &c.text_excerpt,
            RetrievedItem::Policy(p) => &p.text_excerpt,
        }
    }

    pub fn origin(&self) -> Origin {
        match self {
            RetrievedItem::Case(_) => Origin::Case,
            RetrievedItem::Policy(_) => Origin::Policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieved_item_accessors() {
        let item = RetrievedItem::Policy(PolicyClause {
            source_id: "policy-7".into(),
            text_excerpt: "街道办事处应当组织调解".into(),
            relevance_score: 0.82,
            citation: "城市居民委员会组织法 第十条".into(),
            admin_level: Some(AdminLevel::Street),
        });

        assert_eq!(item.source_id(), "policy-7");
        assert_eq!(item.origin(), Origin::Policy);
        assert!((item.relevance_score() - 0.82).abs() < f64::EPSILON);
    }
}
