//! Result domain of the expression engine.
//!
//! A [`Value`] is one of three variants. Operators never convert between
//! variants implicitly; the evaluator rejects mismatched operands instead.
//! The accessors here are the only sanctioned way to look inside a value.

use std::fmt;

/// A typed evaluation result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Double-precision number.
    Number(f64),
    /// Text string.
    Text(String),
    /// Boolean.
    Boolean(bool),
}

impl Value {
    /// Name of the variant as shown in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
        }
    }

    /// Whether both values are the same variant.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Renders the value as stored alongside a calculation.
///
/// Text is written without quotes; numbers follow [`format_number`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Format a number, preferring integer representation when the value is integral.
///
/// Integral values below 1e15 in magnitude print without a fractional part.
/// Everything else uses the shortest decimal that round-trips through `f64`.
#[must_use]
pub fn format_number(v: f64) -> String {
    // Truncation is exact: the value is integral and within i64 range.
    #[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
    if v.is_finite() && v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
