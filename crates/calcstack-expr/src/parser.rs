//! Recursive-descent parser for calculator expressions.
//!
//! Precedence, loosest first: `||`, `&&`, `== !=`, `< <= > >=`, `+ -`,
//! `* / %`, prefix `- !`. Every binary level is left-associative. Nesting
//! depth is bounded by [`Limits::max_depth`] so that neither parsing nor
//! evaluation can exhaust the stack; flat operator chains of any length do
//! not count toward it.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::value::Value;

/// Default maximum nesting depth.
///
/// Parsing and evaluating an expression at this depth fits in a 2 MiB
/// thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resource limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting counted over parentheses, prefix operators and
    /// right operands of binary operators. Each level is released once the
    /// nested expression has been parsed.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Limits {
    /// Limits with the given maximum depth.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// Parse a token list with default limits.
///
/// # Errors
///
/// Returns [`ParseError`] if the tokens do not form exactly one expression.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    parse_with_limits(tokens, &Limits::default())
}

/// Parse a token list, failing with "expression too complex" beyond
/// `limits.max_depth`.
///
/// # Errors
///
/// Returns [`ParseError`] if the tokens do not form exactly one expression.
pub fn parse_with_limits(tokens: Vec<Token>, limits: &Limits) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokens, limits.max_depth);
    let expr = parser.parse_expr(0)?;
    if !parser.at_end() {
        return Err(parser.error(ParseErrorKind::UnexpectedTrailingInput));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn new(mut tokens: Vec<Token>, max_depth: usize) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.position + t.lexeme.len());
            tokens.push(Token::new(TokenKind::Eof, "", end));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Current token. The list always ends with `Eof` and `advance` never
    /// steps past it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            position: self.peek().position,
            kind,
        }
    }

    /// Enter one level of nesting.
    fn descend(&mut self, position: usize) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError {
                position,
                kind: ParseErrorKind::TooComplex,
            });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// The binary operator at the cursor, if any.
    fn peek_binary(&self) -> Option<BinaryOp> {
        let tok = self.peek();
        if tok.kind == TokenKind::Operator {
            BinaryOp::from_symbol(&tok.lexeme)
        } else {
            None
        }
    }

    /// Precedence climbing over every binary operator binding at least as
    /// tightly as `min_precedence`.
    ///
    /// Operators of one level are folded into a left-leaning chain in a loop,
    /// so a long flat chain never deepens the recursion. Only the right
    /// operand of each operator is parsed recursively, and that recursion
    /// counts one level toward the depth limit until it returns.
    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self
            .peek_binary()
            .filter(|op| op.precedence() >= min_precedence)
        {
            let position = self.advance().position;
            self.descend(position)?;
            let right = self.parse_expr(op.precedence() + 1)?;
            self.ascend();
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    /// Prefix `-` and `!`, right-associative.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek();
        let prefix = (tok.kind == TokenKind::Operator)
            .then(|| UnaryOp::from_symbol(&tok.lexeme))
            .flatten();
        let Some(op) = prefix else {
            return self.parse_primary();
        };

        let position = self.advance().position;
        self.descend(position)?;
        let operand = self.parse_unary()?;
        self.ascend();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            position,
        })
    }

    /// Literals, identifiers and parenthesized groups.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().kind {
            TokenKind::Number => {
                let tok = self.advance();
                let n = tok.lexeme.parse::<f64>().map_err(|_| ParseError {
                    position: tok.position,
                    kind: ParseErrorKind::InvalidNumber(tok.lexeme.clone()),
                })?;
                Ok(Expr::Literal(Value::Number(n)))
            }
            TokenKind::String => Ok(Expr::Literal(Value::Text(self.advance().lexeme))),
            TokenKind::Ident => {
                let tok = self.advance();
                let keyword = match tok.lexeme.as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                };
                Ok(match keyword {
                    Some(b) => Expr::Literal(Value::Boolean(b)),
                    None => Expr::Identifier {
                        name: tok.lexeme,
                        position: tok.position,
                    },
                })
            }
            TokenKind::LParen => {
                let open = self.advance();
                self.descend(open.position)?;
                let inner = self.parse_expr(0)?;
                if self.peek().kind != TokenKind::RParen {
                    return Err(self.error(ParseErrorKind::ExpectedClosingParen));
                }
                self.advance();
                self.ascend();
                Ok(Expr::Grouping(Box::new(inner)))
            }
            TokenKind::Operator | TokenKind::RParen | TokenKind::Eof => {
                Err(self.error(ParseErrorKind::ExpectedExpression))
            }
        }
    }
}
