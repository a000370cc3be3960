//! Expression engine for CalcStack.
//!
//! Evaluates arithmetic, comparison and boolean expressions over numbers,
//! strings and booleans. The pipeline is:
//!
//! 1. **Lexing**: [`tokenize`] turns text into positioned tokens.
//! 2. **Parsing**: [`parse_with_limits`] builds an [`Expr`] tree by recursive descent.
//! 3. **Evaluation**: [`evaluate_expr`] walks the tree to produce a [`Value`].
//!
//! The engine keeps no state between calls and is safe to use from any
//! number of threads.
//!
//! ```
//! use calcstack_expr::{Value, evaluate};
//!
//! assert_eq!(evaluate("2 + 3 * 4").unwrap(), Value::Number(14.0));
//! assert_eq!(evaluate(r#""ab" + "cd""#).unwrap().to_string(), "abcd");
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{
    EngineError, EvalError, EvalErrorKind, LexError, LexErrorKind, ParseError, ParseErrorKind,
};
pub use evaluator::evaluate_expr;
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{DEFAULT_MAX_DEPTH, Limits, parse, parse_with_limits};
pub use value::{Value, format_number};

/// Evaluate an expression with default [`Limits`].
///
/// # Errors
///
/// Returns the first [`EngineError`] raised by any stage.
pub fn evaluate(expression: &str) -> Result<Value, EngineError> {
    evaluate_with_limits(expression, &Limits::default())
}

/// Evaluate an expression with caller-supplied [`Limits`].
///
/// # Errors
///
/// Returns the first [`EngineError`] raised by any stage.
pub fn evaluate_with_limits(expression: &str, limits: &Limits) -> Result<Value, EngineError> {
    let tokens = tokenize(expression)?;
    let expr = parse_with_limits(tokens, limits)?;
    Ok(evaluate_expr(&expr)?)
}
