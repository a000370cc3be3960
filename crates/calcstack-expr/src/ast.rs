//! AST types for expression parsing.
//!
//! The AST is produced by the parser and consumed by the evaluator. Every
//! non-leaf node owns its children; operator and identifier nodes keep the
//! byte offset of their token so evaluation errors can point at the source.

use std::fmt;

use crate::value::Value;

/// Expression AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A number, string, or boolean literal.
    Literal(Value),
    /// A bare identifier (variable reference).
    Identifier {
        /// Identifier text.
        name: String,
        /// Byte offset of the identifier.
        position: usize,
    },
    /// Prefix operator application: `op operand`.
    Unary {
        /// Prefix operator.
        op: UnaryOp,
        /// Operand expression.
        operand: Box<Expr>,
        /// Byte offset of the operator.
        position: usize,
    },
    /// Infix operator application: `left op right`.
    Binary {
        /// Infix operator.
        op: BinaryOp,
        /// Left-hand expression.
        left: Box<Expr>,
        /// Right-hand expression.
        right: Box<Expr>,
        /// Byte offset of the operator.
        position: usize,
    },
    /// Parenthesized expression: `( inner )`.
    Grouping(Box<Expr>),
}

impl Expr {
    fn has_children(&self) -> bool {
        matches!(
            self,
            Self::Unary { .. } | Self::Binary { .. } | Self::Grouping(_)
        )
    }

    /// Move every child that has children of its own onto `pending`,
    /// leaving a leaf in its place.
    fn detach_children(&mut self, pending: &mut Vec<Expr>) {
        let mut detach = |child: &mut Expr| {
            if child.has_children() {
                pending.push(std::mem::replace(
                    child,
                    Expr::Literal(Value::Boolean(false)),
                ));
            }
        };
        match self {
            Self::Unary { operand, .. } | Self::Grouping(operand) => detach(&mut **operand),
            Self::Binary { left, right, .. } => {
                detach(&mut **left);
                detach(&mut **right);
            }
            Self::Literal(_) | Self::Identifier { .. } => {}
        }
    }
}

/// Long operator chains build a left spine as deep as the chain is long, so
/// the tree is torn down with an explicit stack instead of recursively.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Numeric negation (`-`).
    Neg,
    /// Logical negation (`!`).
    Not,
}

impl UnaryOp {
    /// Map an operator lexeme in prefix position.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "-" => Some(Self::Neg),
            "!" => Some(Self::Not),
            _ => None,
        }
    }

    /// Source symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Logical OR (`||`).
    Or,
    /// Logical AND (`&&`).
    And,
    /// Equal (`==`).
    Eq,
    /// Not equal (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Addition or text concatenation (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Remainder (`%`).
    Rem,
}

impl BinaryOp {
    /// Map an operator lexeme in infix position.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "||" => Some(Self::Or),
            "&&" => Some(Self::And),
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "%" => Some(Self::Rem),
            _ => None,
        }
    }

    /// Source symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }

    /// Binding strength, 1 (loosest, `||`) to 6 (tightest, `* / %`).
    ///
    /// All binary operators are left-associative.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Renders the tree fully parenthesized, e.g. `(2 + (3 * 4))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Value::Text(s)) => write!(f, "\"{s}\""),
            Self::Literal(v) => write!(f, "{v}"),
            Self::Identifier { name, .. } => f.write_str(name),
            Self::Unary { op, operand, .. } => write!(f, "({op}{operand})"),
            Self::Binary {
                op, left, right, ..
            } => write!(f, "({left} {op} {right})"),
            Self::Grouping(inner) => write!(f, "{inner}"),
        }
    }
}
