//! API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use civicase_core::{Category, EvaluationWeights, Problem, SolveError, CIVICASE_VERSION};
use civicase_pipeline::{BatchRequest, CancelToken, Pipeline};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub problem: Problem,
    #[serde(default)]
    pub weights: Option<EvaluationWeights>,
}

pub async fn solve(
    State(state): State<AppState>,
    Json(request): Json<SolveRequest>,
) -> (StatusCode, Json<Value>) {
    let result = match request.weights {
        Some(weights) => {
            state
                .pipeline
                .solve_with_weights(request.problem, weights)
                .await
        }
        None => state.pipeline.solve(request.problem).await,
    };
    match result {
        Ok(report) => (StatusCode::OK, Json(json!(report))),
        Err(error) => error_response(&error),
    }
}

pub async fn batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> (StatusCode, Json<Value>) {
    match state.pipeline.run_batch(request, CancelToken::new()).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "total": result.len(),
                "succeeded": result.succeeded(),
                "failed": result.failed(),
                "outcomes": result.outcomes,
            })),
        ),
        Err(error) => error_response(&error),
    }
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": CIVICASE_VERSION,
            "categories": Category::ALL.len(),
        })),
    )
}

fn error_response(error: &SolveError) -> (StatusCode, Json<Value>) {
    let status = match error {
        SolveError::InvalidProblem(_)
        | SolveError::InvalidWeights(_)
        | SolveError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        SolveError::RetrievalUnavailable(_) | SolveError::SynthesisFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
        SolveError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
        SolveError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(json!({ "error": error.to_string() })))
}
