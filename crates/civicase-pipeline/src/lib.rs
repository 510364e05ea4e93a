//! civicase-pipeline: solve orchestration
//!
//! Wires classification, retrieval, synthesis and evaluation into a single
//! pipeline, and runs batches of problems concurrently with per-item
//! failure isolation, timeouts and cooperative cancellation.

pub mod batch;
pub mod cancel;
pub mod pipeline;

pub use batch::BatchRequest;
pub use cancel::CancelToken;
pub use pipeline::Pipeline;
