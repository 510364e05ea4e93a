//! Evaluation weight configuration
//!
//! Configured once per pipeline instance and shared read-only across
//! concurrent runs. Validated before any work starts.

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::solution::Dimension;

/// Tolerance when checking that weights sum to 1.0.
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// Per-dimension weights for aggregate scoring.
///
/// One weight per fixed dimension, so coverage of the score map is
/// guaranteed by construction; only the sum needs runtime validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationWeights {
    pub feasibility: f64,
    pub compliance: f64,
    pub effectiveness: f64,
    pub sustainability: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        EvaluationWeights {
            feasibility: 0.25,
            compliance: 0.25,
            effectiveness: 0.25,
            sustainability: 0.25,
        }
    }
}

impl EvaluationWeights {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Feasibility => self.feasibility,
            Dimension::Compliance => self.compliance,
            Dimension::Effectiveness => self.effectiveness,
            Dimension::Sustainability => self.sustainability,
        }
    }

    /// Check that every weight is finite and non-negative and that the sum
    /// is 1.0 within [`WEIGHT_EPSILON`].
    pub fn validate(&self) -> Result<(), SolveError> {
        for dimension in Dimension::ALL {
            let w = self.get(dimension);
            if !w.is_finite() || w < 0.0 {
                return Err(SolveError::InvalidWeights(format!(
                    "{dimension} weight {w} is not a non-negative finite number"
                )));
            }
        }

        let sum: f64 = Dimension::ALL.iter().map(|d| self.get(*d)).sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(SolveError::InvalidWeights(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}
