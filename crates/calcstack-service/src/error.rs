//! Conversions from engine and storage errors to API errors.

use calcstack_expr::EngineError;
use calcstack_model::error::CalcError;

use crate::storage::StorageError;

/// Convert an engine error into an `InvalidExpression` error.
#[must_use]
pub fn expression_error_to_calc(e: EngineError) -> CalcError {
    CalcError::invalid_expression(e.to_string()).with_source(e)
}

/// Convert a storage error into an API error.
#[must_use]
pub fn storage_error_to_calc(e: StorageError) -> CalcError {
    let err = match &e {
        StorageError::NotFound { id } => CalcError::calculation_not_found(id),
        StorageError::AlreadyExists { .. } => CalcError::internal_error(e.to_string()),
    };
    err.with_source(e)
}
