//! Generation context assembly and rendering
//!
//! One structured prompt per run: the problem fields, the top cases, and
//! the top policy excerpts, bounded so the context cannot grow with the
//! index. Rendered through a single embedded Handlebars template.

use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde::Serialize;

use civicase_core::{Case, PolicyClause, Problem, SolveError, SynthesisCause};

/// Bound on cases included in one context.
pub const MAX_CONTEXT_CASES: usize = 5;
/// Bound on policy excerpts included in one context.
pub const MAX_CONTEXT_POLICIES: usize = 5;

const CONTEXT_TEMPLATE: &str = "\
You are a grassroots governance advisor. Draft {{n_candidates}} distinct, \
actionable solution proposal(s) for the problem below, grounded in the \
reference cases and policy basis provided.

## Problem
Location: {{problem.location}}
Urgency: {{problem.urgency_level}}/5
Description: {{problem.description}}
{{#if problem.expected_outcome}}Expected outcome: {{problem.expected_outcome}}
{{/if}}{{#if problem.stakeholders}}Stakeholders: {{#each problem.stakeholders}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}
{{/if}}{{#if problem.constraints}}Constraints: {{#each problem.constraints}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}
{{/if}}
## Reference cases
{{#each cases}}- [{{source_id}}] {{text_excerpt}}
  Outcome: {{outcome_summary}}
{{#each key_measures}}  * {{this}}
{{/each}}{{else}}(no precedent cases matched)
{{/each}}
## Policy basis
{{#each policies}}- [{{citation}}] {{text_excerpt}}
{{else}}(no policy clauses matched)
{{/each}}
Each proposal should name concrete steps, required resources, and an
ongoing mechanism that keeps the solution working after rollout.
";

static TEMPLATES: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);
    handlebars
        .register_template_string("solution_context", CONTEXT_TEMPLATE)
        .expect("embedded context template is malformed");
    handlebars
});

/// The bounded context handed to the generation collaborator.
///
/// Whatever ends up in here is the attribution for every candidate the
/// run produces; supporting items are never inferred from generated text.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub problem: Problem,
    pub cases: Vec<Case>,
    pub policies: Vec<PolicyClause>,
    pub n_candidates: usize,
}

impl PromptContext {
    pub fn new(
        problem: &Problem,
        cases: &[Case],
        policies: &[PolicyClause],
        n_candidates: usize,
    ) -> Self {
        PromptContext {
            problem: problem.clone(),
            cases: cases.iter().take(MAX_CONTEXT_CASES).cloned().collect(),
            policies: policies.iter().take(MAX_CONTEXT_POLICIES).cloned().collect(),
            n_candidates,
        }
    }

    pub fn render(&self) -> Result<String, SolveError> {
        TEMPLATES
            .render("solution_context", self)
            .map_err(|e| SolveError::SynthesisFailed {
                attempts: 0,
                cause: SynthesisCause::Transport(format!("context rendering failed: {e}")),
            })
    }
}
