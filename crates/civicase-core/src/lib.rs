//! Civicase Core: data model, error taxonomy, and collaborator seams
//!
//! Shared types for the case-driven solution pipeline. The core owns no
//! persistent state; retrieved items and candidate solutions live for the
//! duration of one pipeline run unless a caller keeps them.

pub mod batch;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod problem;
pub mod report;
pub mod retrieved;
pub mod solution;
pub mod weights;

pub use batch::{BatchOutcome, BatchResult, ErrorKind, FailureRecord};
pub use collaborators::{Generator, GeneratorError, IndexHit, IndexScope, IndexUnreachable, SemanticIndex};
pub use config::PipelineConfig;
pub use error::{SolveError, Stage, SynthesisCause};
pub use problem::{AdminLevel, Category, Problem};
pub use report::{RetrievalSummary, SolveReport};
pub use retrieved::{Case, Origin, PolicyClause, RetrievedItem};
pub use solution::{CandidateSolution, Dimension, SkippedCandidate};
pub use weights::EvaluationWeights;

/// Engine version reported by the API surface
pub const CIVICASE_VERSION: &str = "0.1.0";
