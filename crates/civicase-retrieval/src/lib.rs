//! Civicase Retrieval: case and policy lookup for a classified problem
//!
//! Coordinates the two semantic-index collaborators, keeping their results
//! deduplicated, thresholded, and deterministically ordered. Never persists
//! anything; an unreachable index is an error, an empty result is not.

pub mod coordinator;

pub use coordinator::{Retrieved, RetrievalCoordinator};
