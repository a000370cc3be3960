//! Request bodies.

use serde::{Deserialize, Serialize};

/// Body of `CreateCalculation` and `UpdateCalculation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Expression to evaluate.
    pub expression: String,
}
