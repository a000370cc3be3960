//! Calculations API operation enum.

use std::fmt;

/// All supported calculations operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalcOperation {
    /// List every stored calculation.
    ListCalculations,
    /// Evaluate an expression and store the result.
    CreateCalculation,
    /// Fetch one calculation by id.
    GetCalculation,
    /// Re-evaluate a calculation with a new expression.
    UpdateCalculation,
    /// Remove a calculation.
    DeleteCalculation,
}

impl CalcOperation {
    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListCalculations => "ListCalculations",
            Self::CreateCalculation => "CreateCalculation",
            Self::GetCalculation => "GetCalculation",
            Self::UpdateCalculation => "UpdateCalculation",
            Self::DeleteCalculation => "DeleteCalculation",
        }
    }

    /// Whether the operation reads a JSON request body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        matches!(self, Self::CreateCalculation | Self::UpdateCalculation)
    }
}

impl fmt::Display for CalcOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_operation_names() {
        for op in [
            CalcOperation::ListCalculations,
            CalcOperation::CreateCalculation,
            CalcOperation::GetCalculation,
            CalcOperation::UpdateCalculation,
            CalcOperation::DeleteCalculation,
        ] {
            assert_eq!(op.to_string(), op.as_str());
        }
        assert_eq!(CalcOperation::UpdateCalculation.as_str(), "UpdateCalculation");
    }

    #[test]
    fn test_should_mark_operations_with_body() {
        assert!(CalcOperation::CreateCalculation.has_body());
        assert!(!CalcOperation::DeleteCalculation.has_body());
        assert!(CalcOperation::UpdateCalculation.has_body());
        assert!(!CalcOperation::GetCalculation.has_body());
    }
}
