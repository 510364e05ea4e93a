//! Retrieval coordination over the case and policy indexes
//!
//! Both indexes are queried concurrently with an over-fetch factor, then
//! each hit list is deduplicated by `source_id` (max score wins), filtered
//! by the relevance threshold, and ordered deterministically: score
//! descending, `source_id` ascending.

use std::collections::HashMap;

use civicase_core::{
    AdminLevel, Case, Category, IndexHit, IndexScope, PolicyClause, Problem, SemanticIndex,
    SolveError,
};
use civicase_classify::TAXONOMY;

/// Over-fetch multiplier applied before dedup and threshold filtering.
const OVERFETCH: usize = 3;

/// Cap on parsed key measures per case.
const MAX_KEY_MEASURES: usize = 5;

/// What one retrieval pass found.
#[derive(Debug, Clone, Default)]
pub struct Retrieved {
    pub cases: Vec<Case>,
    pub policies: Vec<PolicyClause>,
}

pub struct RetrievalCoordinator {
    min_relevance: f64,
}

impl RetrievalCoordinator {
    pub fn new(min_relevance: f64) -> Self {
        RetrievalCoordinator { min_relevance }
    }

    /// Retrieve cases and policy clauses for a classified problem.
    ///
    /// An unreachable index propagates as `RetrievalUnavailable`; a
    /// reachable index with nothing above the threshold yields empty lists.
    pub async fn retrieve(
        &self,
        case_index: &dyn SemanticIndex,
        policy_index: &dyn SemanticIndex,
        problem: &Problem,
        category: Category,
        k_cases: usize,
        k_policies: usize,
    ) -> Result<Retrieved, SolveError> {
        let case_scope = match category {
            Category::General => None,
            scoped => Some(IndexScope::Category(scoped)),
        };
        let policy_scope = match category {
            Category::General => None,
            scoped => Some(IndexScope::Keywords(TAXONOMY.topical_terms(scoped))),
        };

        let (case_hits, policy_hits) = tokio::try_join!(
            case_index.query(&problem.description, case_scope.as_ref(), k_cases * OVERFETCH),
            policy_index.query(
                &problem.description,
                policy_scope.as_ref(),
                k_policies * OVERFETCH
            ),
        )
        .map_err(|e| SolveError::RetrievalUnavailable(e.to_string()))?;

        let case_hits = self.select(case_hits, k_cases);
        let policy_hits = self.select(policy_hits, k_policies);

        tracing::debug!(
            cases = case_hits.len(),
            policies = policy_hits.len(),
            %category,
            "retrieval complete"
        );

        Ok(Retrieved {
            cases: case_hits.into_iter().map(hit_to_case).collect(),
            policies: policy_hits.into_iter().map(hit_to_policy).collect(),
        })
    }

    /// Dedup by `source_id` keeping the max score, drop sub-threshold hits,
    /// order by score descending then `source_id` ascending, keep `k`.
    fn select(&self, hits: Vec<IndexHit>, k: usize) -> Vec<IndexHit> {
        let mut by_id: HashMap<String, IndexHit> = HashMap::new();
        for hit in hits {
            match by_id.get(&hit.source_id) {
                Some(existing) if existing.relevance_score >= hit.relevance_score => {}
                _ => {
                    by_id.insert(hit.source_id.clone(), hit);
                }
            }
        }

        let mut kept: Vec<IndexHit> = by_id
            .into_values()
            .filter(|h| h.relevance_score >= self.min_relevance)
            .collect();

        kept.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.source_id.cmp(&b.source_id))
        });
        kept.truncate(k);
        kept
    }
}

fn hit_to_case(hit: IndexHit) -> Case {
    let outcome_summary = hit.metadata.get("outcome").cloned().unwrap_or_default();
    let key_measures = hit
        .metadata
        .get("measures")
        .map(|m| {
            m.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(MAX_KEY_MEASURES)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Case {
        source_id: hit.source_id,
        text_excerpt: hit.text_excerpt,
        relevance_score: hit.relevance_score,
        outcome_summary,
        key_measures,
    }
}

fn hit_to_policy(hit: IndexHit) -> PolicyClause {
    let citation = hit
        .metadata
        .get("citation")
        .cloned()
        .unwrap_or_else(|| hit.source_id.clone());
    let admin_level = hit
        .metadata
        .get("admin_level")
        .and_then(|v| AdminLevel::parse(v));

    PolicyClause {
        source_id: hit.source_id,
        text_excerpt: hit.text_excerpt,
        relevance_score: hit.relevance_score,
        citation,
        admin_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use civicase_core::IndexUnreachable;

    struct StaticIndex {
        hits: Vec<IndexHit>,
    }

    #[async_trait]
    impl SemanticIndex for StaticIndex {
        async fn query(
            &self,
            _text: &str,
            _scope: Option<&IndexScope>,
            top_k: usize,
        ) -> Result<Vec<IndexHit>, IndexUnreachable> {
            Ok(self.hits.iter().take(top_k).cloned().collect())
        }
    }

    struct DownIndex;

    #[async_trait]
    impl SemanticIndex for DownIndex {
        async fn query(
            &self,
            _text: &str,
            _scope: Option<&IndexScope>,
            _top_k: usize,
        ) -> Result<Vec<IndexHit>, IndexUnreachable> {
            Err(IndexUnreachable("connection refused".into()))
        }
    }

    fn problem() -> Problem {
        Problem::new("社区老年人数字鸿沟问题", "某街道")
    }

    #[tokio::test]
    async fn threshold_filters_weak_hits() {
        let cases = StaticIndex {
            hits: vec![
                IndexHit::new("case-a", "智能手机培训案例", 0.9),
                IndexHit::new("case-b", "不相关案例", 0.1),
            ],
        };
        let policies = StaticIndex { hits: vec![] };

        let coordinator = RetrievalCoordinator::new(0.3);
        let retrieved = coordinator
            .retrieve(&cases, &policies, &problem(), Category::DigitalDivide, 5, 5)
            .await
            .unwrap();

        assert_eq!(retrieved.cases.len(), 1);
        assert_eq!(retrieved.cases[0].source_id, "case-a");
        assert!(retrieved.policies.is_empty());
    }

    #[tokio::test]
    async fn duplicates_keep_max_score() {
        let cases = StaticIndex {
            hits: vec![
                IndexHit::new("case-a", "excerpt one", 0.5),
                IndexHit::new("case-a", "excerpt two", 0.8),
                IndexHit::new("case-a", "excerpt three", 0.6),
            ],
        };
        let policies = StaticIndex { hits: vec![] };

        let coordinator = RetrievalCoordinator::new(0.3);
        let retrieved = coordinator
            .retrieve(&cases, &policies, &problem(), Category::DigitalDivide, 5, 5)
            .await
            .unwrap();

        assert_eq!(retrieved.cases.len(), 1);
        assert!((retrieved.cases[0].relevance_score - 0.8).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn ordering_is_deterministic_on_ties() {
        let cases = StaticIndex {
            hits: vec![
                IndexHit::new("case-z", "tied", 0.7),
                IndexHit::new("case-a", "tied", 0.7),
                IndexHit::new("case-m", "higher", 0.9),
            ],
        };
        let policies = StaticIndex { hits: vec![] };

        let coordinator = RetrievalCoordinator::new(0.3);
        let retrieved = coordinator
            .retrieve(&cases, &policies, &problem(), Category::General, 5, 5)
            .await
            .unwrap();

        let ids: Vec<&str> = retrieved.cases.iter().map(|c| c.source_id.as_str()).collect();
        assert_eq!(ids, vec!["case-m", "case-a", "case-z"]);
    }

    #[tokio::test]
    async fn unreachable_index_propagates() {
        let policies = StaticIndex { hits: vec![] };
        let coordinator = RetrievalCoordinator::new(0.3);
        let result = coordinator
            .retrieve(&DownIndex, &policies, &problem(), Category::General, 5, 5)
            .await;

        assert!(matches!(result, Err(SolveError::RetrievalUnavailable(_))));
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let empty = StaticIndex { hits: vec![] };
        let also_empty = StaticIndex { hits: vec![] };
        let coordinator = RetrievalCoordinator::new(0.3);
        let retrieved = coordinator
            .retrieve(&empty, &also_empty, &problem(), Category::General, 5, 5)
            .await
            .unwrap();

        assert!(retrieved.cases.is_empty());
        assert!(retrieved.policies.is_empty());
    }

    #[test]
    fn metadata_feeds_policy_fields() {
        let hit = IndexHit::new("policy-3", "应当建立长效机制", 0.7)
            .with_meta("citation", "某市社区治理条例 第五条")
            .with_meta("admin_level", "municipal");

        let clause = hit_to_policy(hit);
        assert_eq!(clause.citation, "某市社区治理条例 第五条");
        assert_eq!(clause.admin_level, Some(AdminLevel::Municipal));
    }

    #[test]
    fn measures_are_parsed_and_bounded() {
        let hit = IndexHit::new("case-9", "text", 0.8)
            .with_meta("measures", "a; b; c; d; e; f; g")
            .with_meta("outcome", "问题解决");

        let case = hit_to_case(hit);
        assert_eq!(case.key_measures.len(), MAX_KEY_MEASURES);
        assert_eq!(case.outcome_summary, "问题解决");
    }
}
