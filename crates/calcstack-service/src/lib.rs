//! Calculations business logic for CalcStack.
//!
//! The provider evaluates expressions with [`calcstack_expr`] and stores the
//! results in a [`storage::CalculationRepository`]. The handler bridges the
//! provider to the HTTP layer.

pub mod error;
pub mod handler;
pub mod provider;
pub mod storage;

pub use handler::CalcStackHandler;
pub use provider::CalcProvider;
pub use storage::{CalculationRepository, InMemoryRepository, StorageError};
