//! Error types for each stage of the expression pipeline.
//!
//! Every error carries the byte offset in the source text where it was
//! detected. [`EngineError`] unifies the three stages for callers of
//! [`crate::evaluate`].

use std::fmt;

/// What went wrong while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    UnexpectedChar(char),
    /// A string literal with no closing quote before end of input.
    UnterminatedString,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar(c) => write!(f, "unexpected character '{c}'"),
            Self::UnterminatedString => f.write_str("unterminated string"),
        }
    }
}

/// Tokenization failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lex error at {position}: {kind}")]
pub struct LexError {
    /// Byte offset of the offending character (or opening quote).
    pub position: usize,
    /// Failure kind.
    pub kind: LexErrorKind,
}

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An operand was required but the token cannot start one.
    ExpectedExpression,
    /// A parenthesized group was not closed.
    ExpectedClosingParen,
    /// A complete expression was followed by more tokens.
    UnexpectedTrailingInput,
    /// The nesting limit was exceeded.
    TooComplex,
    /// A number lexeme could not be converted to a float.
    InvalidNumber(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedExpression => f.write_str("expected expression"),
            Self::ExpectedClosingParen => f.write_str("expected )"),
            Self::UnexpectedTrailingInput => f.write_str("unexpected trailing input"),
            Self::TooComplex => f.write_str("expression too complex"),
            Self::InvalidNumber(lexeme) => write!(f, "invalid number literal '{lexeme}'"),
        }
    }
}

/// Syntax failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at {position}: {kind}")]
pub struct ParseError {
    /// Byte offset of the token where parsing failed.
    pub position: usize,
    /// Failure kind.
    pub kind: ParseErrorKind,
}

/// What went wrong while evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// Operand variants are not accepted by the operator.
    TypeMismatch {
        /// Operator symbol.
        operator: &'static str,
        /// Human-readable operand type description, e.g. `number and text`.
        operands: String,
    },
    /// `/` or `%` with a zero right operand.
    DivisionByZero,
    /// An identifier was referenced; the engine has no bindings.
    UndefinedIdentifier(String),
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { operator, operands } => {
                write!(f, "type mismatch: '{operator}' cannot be applied to {operands}")
            }
            Self::DivisionByZero => f.write_str("division by zero"),
            Self::UndefinedIdentifier(name) => write!(f, "undefined identifier: {name}"),
        }
    }
}

/// Runtime failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("eval error at {position}: {kind}")]
pub struct EvalError {
    /// Byte offset of the operator or identifier that failed.
    pub position: usize,
    /// Failure kind.
    pub kind: EvalErrorKind,
}

/// Any failure produced by [`crate::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Tokenization failed.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl EngineError {
    /// Byte offset in the source text where the failure was detected.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::Lex(e) => e.position,
            Self::Parse(e) => e.position,
            Self::Eval(e) => e.position,
        }
    }

    /// Short stage name: `lex`, `parse`, or `eval`.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Lex(_) => "lex",
            Self::Parse(_) => "parse",
            Self::Eval(_) => "eval",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_render_stage_messages() {
        let err = EngineError::from(ParseError {
            position: 6,
            kind: ParseErrorKind::ExpectedClosingParen,
        });
        assert_eq!(err.to_string(), "parse error at 6: expected )");
        assert_eq!(err.position(), 6);
        assert_eq!(err.stage(), "parse");

        let err = EngineError::from(EvalError {
            position: 0,
            kind: EvalErrorKind::UndefinedIdentifier("x".to_owned()),
        });
        assert_eq!(err.to_string(), "eval error at 0: undefined identifier: x");
    }

    #[test]
    fn test_should_render_type_mismatch() {
        let kind = EvalErrorKind::TypeMismatch {
            operator: "+",
            operands: "number and text".to_owned(),
        };
        assert_eq!(
            kind.to_string(),
            "type mismatch: '+' cannot be applied to number and text"
        );
    }
}
