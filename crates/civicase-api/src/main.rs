//! Binary entrypoint for the Civicase API server.
use std::sync::Arc;

use civicase_api::demo::{InMemoryIndex, TemplateGenerator};
use civicase_api::run;
use civicase_core::PipelineConfig;
use civicase_pipeline::Pipeline;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civicase=info,tower_http=info".into()),
        )
        .init();

    let config = PipelineConfig::from_env();
    let pipeline = Pipeline::new(
        config,
        Arc::new(InMemoryIndex::seeded_cases()),
        Arc::new(InMemoryIndex::seeded_policies()),
        Arc::new(TemplateGenerator),
    )
    .expect("invalid pipeline configuration");

    // Default listen address can be overridden with CIVICASE_ADDR
    let addr = std::env::var("CIVICASE_ADDR").unwrap_or_else(|_| "0.0.0.0:8790".to_string());
    run(&addr, Arc::new(pipeline)).await;
}
