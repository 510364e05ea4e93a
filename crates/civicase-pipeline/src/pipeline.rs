//! The end-to-end solve pipeline
//!
//! ```text
//!   Problem ──► classify ──► retrieve ──► synthesize ──► evaluate ──► SolveReport
//!                  │             │             │              │
//!               taxonomy    case+policy    generator     weighted rank
//!                            indexes       (retried)
//! ```
//!
//! The pipeline owns its collaborators behind trait objects so callers can
//! plug in any semantic index or generator backend. A single run is
//! fallible at every stage; batch runs wrap each problem in its own
//! failure domain (see [`crate::batch`]).

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use civicase_classify::classify;
use civicase_core::{
    Generator, PipelineConfig, Problem, RetrievalSummary, SemanticIndex, SolveError, SolveReport,
    Stage,
};
use civicase_eval::EvaluationEngine;
use civicase_retrieval::RetrievalCoordinator;
use civicase_synthesis::Synthesizer;

/// A stage error, kept crate-private so batch slots can record which stage
/// failed while single-run callers see only the [`SolveError`].
pub(crate) struct StagedError {
    pub stage: Stage,
    pub error: SolveError,
}

impl StagedError {
    fn new(stage: Stage, error: SolveError) -> Self {
        StagedError { stage, error }
    }
}

pub struct Pipeline {
    pub(crate) config: PipelineConfig,
    case_index: Arc<dyn SemanticIndex>,
    policy_index: Arc<dyn SemanticIndex>,
    generator: Arc<dyn Generator>,
    coordinator: RetrievalCoordinator,
    synthesizer: Synthesizer,
    engine: EvaluationEngine,
}

impl Pipeline {
    /// Assemble a pipeline over the given backends. Rejects an invalid
    /// configuration up front.
    pub fn new(
        config: PipelineConfig,
        case_index: Arc<dyn SemanticIndex>,
        policy_index: Arc<dyn SemanticIndex>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self, SolveError> {
        config.validate()?;
        let engine = EvaluationEngine::new(config.weights)?;
        let coordinator = RetrievalCoordinator::new(config.min_relevance);
        let synthesizer = Synthesizer::new(config.max_generation_retries);
        Ok(Pipeline {
            config,
            case_index,
            policy_index,
            generator,
            coordinator,
            synthesizer,
            engine,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline for one problem.
    pub async fn solve(&self, problem: Problem) -> Result<SolveReport, SolveError> {
        self.solve_staged(problem, &self.engine)
            .await
            .map_err(|staged| staged.error)
    }

    /// Like [`Pipeline::solve`] but scoring under caller-supplied weights
    /// instead of the configured defaults.
    pub async fn solve_with_weights(
        &self,
        problem: Problem,
        weights: civicase_core::EvaluationWeights,
    ) -> Result<SolveReport, SolveError> {
        let engine = EvaluationEngine::new(weights)?;
        self.solve_staged(problem, &engine)
            .await
            .map_err(|staged| staged.error)
    }

    /// Stage-attributed variant used by both [`Pipeline::solve`] and the
    /// batch orchestrator.
    pub(crate) async fn solve_staged(
        &self,
        mut problem: Problem,
        engine: &EvaluationEngine,
    ) -> Result<SolveReport, StagedError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();

        let category =
            classify(&problem).map_err(|e| StagedError::new(Stage::Classify, e))?;
        problem.assign_category(category);
        info!(%run_id, %category, "problem classified");

        let retrieved = self
            .coordinator
            .retrieve(
                self.case_index.as_ref(),
                self.policy_index.as_ref(),
                &problem,
                category,
                self.config.k_cases,
                self.config.k_policies,
            )
            .await
            .map_err(|e| StagedError::new(Stage::Retrieve, e))?;

        let retrieval = RetrievalSummary {
            case_count: retrieved.cases.len(),
            policy_count: retrieved.policies.len(),
            top_case_score: retrieved.cases.first().map(|c| c.relevance_score),
            top_policy_score: retrieved.policies.first().map(|p| p.relevance_score),
        };

        let candidates = self
            .synthesizer
            .synthesize(
                self.generator.as_ref(),
                &problem,
                &retrieved.cases,
                &retrieved.policies,
                self.config.n_candidates,
            )
            .await
            .map_err(|e| StagedError::new(Stage::Synthesize, e))?;

        let evaluated = engine.evaluate_all(candidates, &problem);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            %run_id,
            ranked = evaluated.ranked.len(),
            skipped = evaluated.skipped.len(),
            elapsed_ms,
            "solve complete"
        );

        Ok(SolveReport {
            run_id,
            problem,
            ranked: evaluated.ranked,
            skipped: evaluated.skipped,
            retrieval,
            elapsed_ms,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use civicase_core::{
        GeneratorError, IndexHit, IndexScope, IndexUnreachable, SynthesisCause,
    };

    struct FixedIndex {
        hits: Vec<IndexHit>,
    }

    #[async_trait]
    impl SemanticIndex for FixedIndex {
        async fn query(
            &self,
            _text: &str,
            _scope: Option<&IndexScope>,
            _top_k: usize,
        ) -> Result<Vec<IndexHit>, IndexUnreachable> {
            Ok(self.hits.clone())
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
            Err(IndexUnreachable("index offline".into()))
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, _context: &str, n: usize) -> Result<Vec<String>, GeneratorError> {
            Ok((0..n)
                .map(|i| format!("方案{}：组织志愿者并建立长效机制", i + 1))
                .collect())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _context: &str, _n: usize) -> Result<Vec<String>, GeneratorError> {
            Err(GeneratorError("upstream 503".into()))
        }
    }

    fn case_hits() -> Vec<IndexHit> {
        vec![
            IndexHit::new("case-1", "某社区开设智能手机课堂", 0.9)
                .with_meta("outcome", "老年人参与度显著提升"),
            IndexHit::new("case-2", "志愿者结对帮扶", 0.7),
        ]
    }

    fn policy_hits() -> Vec<IndexHit> {
        vec![IndexHit::new("policy-1", "关于切实解决老年人运用智能技术困难的实施方案", 0.8)
            .with_meta("citation", "国办发〔2020〕45号")]
    }

    fn pipeline_with(generator: Arc<dyn Generator>) -> Pipeline {
        Pipeline::new(
            PipelineConfig::default(),
            Arc::new(FixedIndex { hits: case_hits() }),
            Arc::new(FixedIndex {
                hits: policy_hits(),
            }),
            generator,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn solve_produces_ranked_report() {
        let pipeline = pipeline_with(Arc::new(EchoGenerator));
        let problem = Problem::new("社区老年人数字鸿沟问题，智能手机使用困难", "某社区");

        let report = pipeline.solve(problem).await.unwrap();

        assert!(report.problem.category.is_some());
        assert_eq!(report.retrieval.case_count, 2);
        assert_eq!(report.retrieval.policy_count, 1);
        assert_eq!(report.ranked.len(), 1);
        assert!(report.best().unwrap().is_scored());
        assert_eq!(report.best().unwrap().supporting_cases.len(), 2);
    }

    #[tokio::test]
    async fn invalid_problem_fails_at_classify() {
        let pipeline = pipeline_with(Arc::new(EchoGenerator));
        let problem = Problem::new("", "某社区");

        let err = pipeline.solve(problem).await.unwrap_err();
        assert!(matches!(err, SolveError::InvalidProblem(_)));
    }

    #[tokio::test]
    async fn unreachable_index_fails_at_retrieve() {
        let pipeline = Pipeline::new(
            PipelineConfig::default(),
            Arc::new(DownIndex),
            Arc::new(FixedIndex {
                hits: policy_hits(),
            }),
            Arc::new(EchoGenerator),
        )
        .unwrap();

        let err = pipeline
            .solve(Problem::new("小区停车难", "某小区"))
            .await
            .unwrap_err();
        assert!(matches!(err, SolveError::RetrievalUnavailable(_)));
    }

    #[tokio::test]
    async fn exhausted_generator_fails_at_synthesize() {
        let pipeline = pipeline_with(Arc::new(FailingGenerator));

        let err = pipeline
            .solve(Problem::new("小区停车难", "某小区"))
            .await
            .unwrap_err();
        match err {
            SolveError::SynthesisFailed { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(matches!(cause, SynthesisCause::Transport(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn rejects_invalid_configuration() {
        let config = PipelineConfig {
            concurrency: 0,
            ..PipelineConfig::default()
        };
        let result = Pipeline::new(
            config,
            Arc::new(FixedIndex { hits: vec![] }),
            Arc::new(FixedIndex { hits: vec![] }),
            Arc::new(EchoGenerator),
        );
        assert!(matches!(result, Err(SolveError::InvalidConfig(_))));
    }
}
