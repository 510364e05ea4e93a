//! External collaborator seams: semantic index and generation service
//!
//! Both are black boxes to the core. The index is read-mostly and the
//! generator is a stateless call; neither requires locking and both may be
//! shared across concurrent pipeline runs.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::problem::Category;

/// One hit from a similarity query.
///
/// `metadata` carries whatever the index stored alongside the document
/// (outcome summaries, citations, admin levels); the retrieval coordinator
/// interprets the keys it knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexHit {
    pub source_id: String,
    pub text_excerpt: String,
    /// 0.0 to 1.0, larger is more relevant.
    pub relevance_score: f64,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl IndexHit {
    pub fn new(source_id: impl Into<String>, text_excerpt: impl Into<String>, score: f64) -> Self {
        IndexHit {
            source_id: source_id.into(),
            text_excerpt: text_excerpt.into(),
            relevance_score: score,
            metadata: HashMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Optional scoping for a similarity query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexScope {
    /// Restrict to documents tagged with one category.
    Category(Category),
    /// Restrict to documents topically matching any of these terms.
    Keywords(Vec<String>),
}

/// The index could not be reached at all.
///
/// Semantically different from a query that matched nothing; an empty hit
/// list is a successful response.
#[derive(Error, Debug, Clone)]
#[error("semantic index unreachable: {0}")]
pub struct IndexUnreachable(pub String);

/// Vector-similarity search over stored documents.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    /// Return up to `top_k` hits for `text`, most relevant first.
    async fn query(
        &self,
        text: &str,
        scope: Option<&IndexScope>,
        top_k: usize,
    ) -> Result<Vec<IndexHit>, IndexUnreachable>;
}

/// Transport-level generation failure. An empty-but-successful response is
/// handled by the synthesizer, not reported here.
#[derive(Error, Debug, Clone)]
#[error("generation transport error: {0}")]
pub struct GeneratorError(pub String);

/// Language-generation service turning a prompt context into candidate
/// solution texts.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate `n` candidate texts for the given context.
    async fn generate(&self, context: &str, n: usize) -> Result<Vec<String>, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedIndex;

    #[async_trait]
    impl SemanticIndex for FixedIndex {
        async fn query(
            &self,
            _text: &str,
            _scope: Option<&IndexScope>,
            top_k: usize,
        ) -> Result<Vec<IndexHit>, IndexUnreachable> {
            Ok(vec![IndexHit::new("case-1", "示例案例", 0.9)]
                .into_iter()
                .take(top_k)
                .collect())
        }
    }

    #[tokio::test]
    async fn trait_objects_are_queryable() {
        let index: Box<dyn SemanticIndex> = Box::new(FixedIndex);
        let hits = index.query("垃圾分类", None, 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source_id, "case-1");
    }
}
