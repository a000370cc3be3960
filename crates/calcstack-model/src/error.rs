//! Calculations API error types.
//!
//! Errors are returned as JSON `{"error": "<code>", "message": "<detail>"}`
//! with the status code attached to the error.

use std::fmt;

/// Error codes returned by the calculations API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum CalcErrorCode {
    /// The expression failed to lex, parse, or evaluate.
    InvalidExpression,
    /// The request body is malformed, missing fields, or too large.
    #[default]
    InvalidRequest,
    /// Unknown record id or path.
    NotFound,
    /// Known path, unsupported method.
    MethodNotAllowed,
    /// Unexpected server-side failure.
    InternalError,
}

impl CalcErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidExpression => "InvalidExpression",
            Self::InvalidRequest => "InvalidRequest",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InvalidExpression | Self::InvalidRequest => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for CalcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calculations API error response.
#[derive(Debug)]
pub struct CalcError {
    /// The error code.
    pub code: CalcErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CalcError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl CalcError {
    /// Create a new `CalcError` from an error code.
    #[must_use]
    pub fn new(code: CalcErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `CalcError` with a custom message.
    #[must_use]
    pub fn with_message(code: CalcErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Expression rejected by the engine.
    #[must_use]
    pub fn invalid_expression(message: impl Into<String>) -> Self {
        Self::with_message(CalcErrorCode::InvalidExpression, message)
    }

    /// Malformed request.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_message(CalcErrorCode::InvalidRequest, message)
    }

    /// No calculation with the given id.
    #[must_use]
    pub fn calculation_not_found(id: &str) -> Self {
        Self::with_message(
            CalcErrorCode::NotFound,
            format!("calculation not found: {id}"),
        )
    }

    /// No route for the given path.
    #[must_use]
    pub fn route_not_found(path: &str) -> Self {
        Self::with_message(CalcErrorCode::NotFound, format!("no route for {path}"))
    }

    /// Method not supported on a known path.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method, path: &str) -> Self {
        Self::with_message(
            CalcErrorCode::MethodNotAllowed,
            format!("method {method} not allowed on {path}"),
        )
    }

    /// Internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(CalcErrorCode::InternalError, message)
    }
}
