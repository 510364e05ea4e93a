//! Civicase API /v1: REST endpoints over the solve pipeline

pub mod demo;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use civicase_pipeline::Pipeline;

use handlers::AppState;

pub fn create_app(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/v1/solve", post(handlers::solve))
        .route("/v1/batch", post(handlers::batch))
        .route("/v1/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline })
}

pub async fn run(addr: &str, pipeline: Arc<Pipeline>) {
    let app = create_app(pipeline);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    tracing::info!("Civicase API listening on {}", addr);
    axum::serve(listener, app).await.expect("Server error");
}
