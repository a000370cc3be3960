//! Calculations provider.
//!
//! Each mutating operation evaluates the expression first and only touches
//! storage when evaluation succeeds, so a rejected expression never leaves a
//! record behind.

use std::sync::Arc;

use chrono::Utc;

use calcstack_core::CalcStackConfig;
use calcstack_expr::Limits;
use calcstack_model::error::CalcError;
use calcstack_model::input::CalculationInput;
use calcstack_model::types::Calculation;

use crate::error::{expression_error_to_calc, storage_error_to_calc};
use crate::storage::{CalculationRepository, InMemoryRepository};

/// Main provider implementing all calculation operations.
#[derive(Debug)]
pub struct CalcProvider {
    repository: Arc<dyn CalculationRepository>,
    limits: Limits,
}

impl CalcProvider {
    /// Create a provider backed by an in-memory repository.
    #[must_use]
    pub fn new(config: &CalcStackConfig) -> Self {
        Self::with_repository(
            Arc::new(InMemoryRepository::new()),
            Limits::with_max_depth(config.max_depth),
        )
    }

    /// Create a provider over an existing repository.
    #[must_use]
    pub fn with_repository(repository: Arc<dyn CalculationRepository>, limits: Limits) -> Self {
        Self { repository, limits }
    }

    /// Evaluate an expression and render the result.
    fn evaluate(&self, expression: &str) -> Result<String, CalcError> {
        match calcstack_expr::evaluate_with_limits(expression, &self.limits) {
            Ok(value) => Ok(value.to_string()),
            Err(e) => {
                tracing::warn!(
                    expression,
                    stage = e.stage(),
                    position = e.position(),
                    error = %e,
                    "rejected expression"
                );
                Err(expression_error_to_calc(e))
            }
        }
    }
}

impl CalcProvider {
    /// Handle `ListCalculations`.
    #[must_use]
    pub fn handle_list_calculations(&self) -> Vec<Calculation> {
        self.repository.list()
    }

    /// Handle `CreateCalculation`.
    pub fn handle_create_calculation(
        &self,
        input: CalculationInput,
    ) -> Result<Calculation, CalcError> {
        let result = self.evaluate(&input.expression)?;
        let id = uuid::Uuid::new_v4().to_string();
        let calculation = Calculation::new(id, input.expression, result, Utc::now());
        let created = self
            .repository
            .create(calculation)
            .map_err(storage_error_to_calc)?;
        tracing::info!(id = %created.id, result = %created.result, "created calculation");
        Ok(created)
    }

    /// Handle `GetCalculation`.
    pub fn handle_get_calculation(&self, id: &str) -> Result<Calculation, CalcError> {
        self.repository.get(id).map_err(storage_error_to_calc)
    }

    /// Handle `UpdateCalculation`.
    ///
    /// An unknown id is reported before the expression is looked at.
    pub fn handle_update_calculation(
        &self,
        id: &str,
        input: CalculationInput,
    ) -> Result<Calculation, CalcError> {
        self.repository.get(id).map_err(storage_error_to_calc)?;
        let result = self.evaluate(&input.expression)?;
        let updated = self
            .repository
            .update(id, input.expression, result, Utc::now())
            .map_err(storage_error_to_calc)?;
        tracing::info!(id, result = %updated.result, "updated calculation");
        Ok(updated)
    }

    /// Handle `DeleteCalculation`.
    pub fn handle_delete_calculation(&self, id: &str) -> Result<(), CalcError> {
        self.repository.delete(id).map_err(storage_error_to_calc)?;
        tracing::info!(id, "deleted calculation");
        Ok(())
    }
}
