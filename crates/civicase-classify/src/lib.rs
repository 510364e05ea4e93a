//! Civicase Classify: keyword-weighted problem classification
//!
//! Maps free-text problem descriptions onto the fixed governance category
//! taxonomy. Deterministic and side-effect free; the keyword table is
//! immutable process-wide configuration.

pub mod classifier;
pub mod taxonomy;

pub use classifier::{classify, classify_text, MIN_CATEGORY_SCORE};
pub use taxonomy::{CategoryEntry, Taxonomy, TriggerTerm, TAXONOMY};
