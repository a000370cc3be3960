//! Core configuration and error types for CalcStack.
//!
//! This crate provides the building blocks shared by every CalcStack crate:
//! the environment-driven [`CalcStackConfig`] and the infrastructure-level
//! [`CalcStackError`].

mod config;
mod error;

pub use config::CalcStackConfig;
pub use error::{CalcStackError, CalcStackResult};
