//! Wire types for the CalcStack calculations API.
//!
//! Records and request bodies are plain serde structs with `snake_case` JSON
//! field names. Errors carry a short code, a message, and an HTTP status.

pub mod error;
pub mod input;
pub mod operations;
pub mod types;

pub use error::{CalcError, CalcErrorCode};
pub use input::CalculationInput;
pub use operations::CalcOperation;
pub use types::Calculation;
