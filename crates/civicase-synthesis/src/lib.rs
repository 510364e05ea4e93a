//! Civicase Synthesis: structured context + candidate generation
//!
//! Builds the bounded prompt context for one run and drives the generation
//! collaborator with a fixed retry budget. Candidates carry full
//! attribution to the context contents.

pub mod context;
pub mod synthesizer;

pub use context::{PromptContext, MAX_CONTEXT_CASES, MAX_CONTEXT_POLICIES};
pub use synthesizer::Synthesizer;
