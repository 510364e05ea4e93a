//! Candidate synthesis with a bounded retry loop
//!
//! The generation call is retried with an identical context up to a fixed
//! number of extra attempts; a transport error and an empty response are
//! retried the same way but reported as distinct causes if the budget runs
//! out.

use civicase_core::{
    CandidateSolution, Case, Generator, PolicyClause, Problem, SolveError, SynthesisCause,
};

use crate::context::PromptContext;

pub struct Synthesizer {
    max_retries: u32,
}

impl Synthesizer {
    pub fn new(max_retries: u32) -> Self {
        Synthesizer { max_retries }
    }

    /// Produce `n_candidates` candidates, each fully attributed to the
    /// retrieved items that were in the generation context.
    pub async fn synthesize(
        &self,
        generator: &dyn Generator,
        problem: &Problem,
        cases: &[Case],
        policies: &[PolicyClause],
        n_candidates: usize,
    ) -> Result<Vec<CandidateSolution>, SolveError> {
        let context = PromptContext::new(problem, cases, policies, n_candidates);
        let rendered = context.render()?;

        let attempts = self.max_retries + 1;
        let mut last_cause = SynthesisCause::Empty;

        for attempt in 1..=attempts {
            match generator.generate(&rendered, n_candidates).await {
                Ok(texts) => {
                    let texts: Vec<String> = texts
                        .into_iter()
                        .filter(|t| !t.trim().is_empty())
                        .collect();
                    if texts.is_empty() {
                        last_cause = SynthesisCause::Empty;
                        tracing::warn!(attempt, "generator returned empty content, retrying");
                        continue;
                    }

                    return Ok(texts
                        .into_iter()
                        .enumerate()
                        .map(|(ordinal, content)| {
                            CandidateSolution::new(
                                ordinal,
                                content,
                                context.cases.clone(),
                                context.policies.clone(),
                            )
                        })
                        .collect());
                }
                Err(e) => {
                    last_cause = SynthesisCause::Transport(e.to_string());
                    tracing::warn!(attempt, error = %e, "generation call failed, retrying");
                }
            }
        }

        Err(SolveError::SynthesisFailed {
            attempts,
            cause: last_cause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use civicase_core::GeneratorError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedGenerator {
        calls: AtomicU32,
        fail_first: u32,
        produce: Vec<String>,
    }

    impl ScriptedGenerator {
        fn new(fail_first: u32, produce: Vec<String>) -> Self {
            ScriptedGenerator {
                calls: AtomicU32::new(0),
                fail_first,
                produce,
            }
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, _context: &str, _n: usize) -> Result<Vec<String>, GeneratorError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(GeneratorError("upstream 503".into()));
            }
            Ok(self.produce.clone())
        }
    }

    fn problem() -> Problem {
        Problem::new("楼道消防通道被杂物占用", "某小区")
    }

    #[tokio::test]
    async fn succeeds_after_transport_retries() {
        let generator = ScriptedGenerator::new(2, vec!["清理方案：分三阶段推进".into()]);
        let synthesizer = Synthesizer::new(2);

        let candidates = synthesizer
            .synthesize(&generator, &problem(), &[], &[], 1)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ordinal, 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_transport_retries_report_cause() {
        let generator = ScriptedGenerator::new(10, vec![]);
        let synthesizer = Synthesizer::new(2);

        let err = synthesizer
            .synthesize(&generator, &problem(), &[], &[], 1)
            .await
            .unwrap_err();

        match err {
            SolveError::SynthesisFailed { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(matches!(cause, SynthesisCause::Transport(_)));
            }
            other => panic!("expected SynthesisFailed, got {other}"),
        }
    }

    #[tokio::test]
    async fn blank_output_counts_as_empty() {
        let generator = ScriptedGenerator::new(0, vec!["   ".into(), "".into()]);
        let synthesizer = Synthesizer::new(1);

        let err = synthesizer
            .synthesize(&generator, &problem(), &[], &[], 2)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SolveError::SynthesisFailed {
                cause: SynthesisCause::Empty,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn attribution_is_the_context_contents() {
        let case = Case {
            source_id: "case-1".into(),
            text_excerpt: "志愿者巡查".into(),
            relevance_score: 0.8,
            outcome_summary: "通道畅通".into(),
            key_measures: vec![],
        };
        let generator = ScriptedGenerator::new(0, vec!["方案文本".into()]);
        let synthesizer = Synthesizer::new(0);

        let candidates = synthesizer
            .synthesize(&generator, &problem(), &[case], &[], 1)
            .await
            .unwrap();

        assert_eq!(candidates[0].supporting_cases.len(), 1);
        assert_eq!(candidates[0].supporting_cases[0].source_id, "case-1");
        assert!(candidates[0].supporting_policies.is_empty());
    }
}
