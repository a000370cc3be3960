//! Error types for the CalcStack core.

/// Core error type for CalcStack infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum CalcStackError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {key}: {value}")]
    InvalidEnvValue {
        /// Environment variable name.
        key: String,
        /// The rejected raw value.
        value: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for CalcStack operations.
pub type CalcStackResult<T> = Result<T, CalcStackError>;
