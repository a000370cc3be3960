//! Tree-walking evaluator.
//!
//! Operands never convert between variants. `&&` and `||` evaluate their
//! right operand only when the left one does not decide the result.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{EvalError, EvalErrorKind};
use crate::value::Value;

/// Evaluate a parsed expression.
///
/// # Errors
///
/// Returns [`EvalError`] on a type mismatch, a zero divisor, or any
/// identifier reference.
pub fn evaluate_expr(expr: &Expr) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Identifier { name, position } => Err(EvalError {
            position: *position,
            kind: EvalErrorKind::UndefinedIdentifier(name.clone()),
        }),
        Expr::Grouping(inner) => evaluate_expr(inner),
        Expr::Unary {
            op,
            operand,
            position,
        } => {
            let value = evaluate_expr(operand)?;
            apply_unary(*op, value, *position)
        }
        Expr::Binary { .. } => evaluate_chain(expr),
    }
}

/// Evaluate a left-leaning chain of binary nodes without recursing down
/// its left spine.
fn evaluate_chain(expr: &Expr) -> Result<Value, EvalError> {
    let mut steps = Vec::new();
    let mut leftmost = expr;
    while let Expr::Binary {
        op,
        left,
        right,
        position,
    } = leftmost
    {
        steps.push((*op, right.as_ref(), *position));
        leftmost = left.as_ref();
    }

    let mut acc = evaluate_expr(leftmost)?;
    for (op, right, position) in steps.into_iter().rev() {
        acc = match op {
            BinaryOp::And | BinaryOp::Or => eval_logical(op, acc, right, position)?,
            _ => {
                let r = evaluate_expr(right)?;
                apply_binary(op, &acc, &r, position)?
            }
        };
    }
    Ok(acc)
}

/// `&&` / `||` with an already evaluated left operand. The right operand is
/// evaluated only when the left one does not decide the result.
fn eval_logical(
    op: BinaryOp,
    left: Value,
    right: &Expr,
    position: usize,
) -> Result<Value, EvalError> {
    let Value::Boolean(lb) = left else {
        return Err(type_mismatch(op.symbol(), left.type_name().to_owned(), position));
    };
    match (op, lb) {
        (BinaryOp::And, false) => return Ok(Value::Boolean(false)),
        (BinaryOp::Or, true) => return Ok(Value::Boolean(true)),
        _ => {}
    }
    let r = evaluate_expr(right)?;
    apply_binary(op, &Value::Boolean(lb), &r, position)
}

fn apply_unary(op: UnaryOp, value: Value, position: usize) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (op, other) => Err(type_mismatch(
            op.symbol(),
            other.type_name().to_owned(),
            position,
        )),
    }
}

/// Apply a binary operator to two evaluated operands.
fn apply_binary(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    position: usize,
) -> Result<Value, EvalError> {
    use Value::{Boolean, Number, Text};

    let value = match (op, left, right) {
        (BinaryOp::Add, Number(a), Number(b)) => Number(a + b),
        (BinaryOp::Add, Text(a), Text(b)) => Text(format!("{a}{b}")),
        (BinaryOp::Sub, Number(a), Number(b)) => Number(a - b),
        (BinaryOp::Mul, Number(a), Number(b)) => Number(a * b),
        (BinaryOp::Div | BinaryOp::Rem, Number(_), Number(b)) if *b == 0.0 => {
            return Err(EvalError {
                position,
                kind: EvalErrorKind::DivisionByZero,
            });
        }
        (BinaryOp::Div, Number(a), Number(b)) => Number(a / b),
        (BinaryOp::Rem, Number(a), Number(b)) => Number(a % b),
        (BinaryOp::Lt, Number(a), Number(b)) => Boolean(a < b),
        (BinaryOp::Le, Number(a), Number(b)) => Boolean(a <= b),
        (BinaryOp::Gt, Number(a), Number(b)) => Boolean(a > b),
        (BinaryOp::Ge, Number(a), Number(b)) => Boolean(a >= b),
        (BinaryOp::Eq, l, r) if l.same_type(r) => Boolean(l == r),
        (BinaryOp::Ne, l, r) if l.same_type(r) => Boolean(l != r),
        (BinaryOp::And, Boolean(a), Boolean(b)) => Boolean(*a && *b),
        (BinaryOp::Or, Boolean(a), Boolean(b)) => Boolean(*a || *b),
        (op, l, r) => {
            return Err(type_mismatch(
                op.symbol(),
                format!("{} and {}", l.type_name(), r.type_name()),
                position,
            ));
        }
    };
    Ok(value)
}

fn type_mismatch(operator: &'static str, operands: String, position: usize) -> EvalError {
    EvalError {
        position,
        kind: EvalErrorKind::TypeMismatch { operator, operands },
    }
}
