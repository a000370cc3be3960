//! Tokenizer for expression strings.
//!
//! Produces a flat token list that always ends with [`TokenKind::Eof`], so
//! the parser never reads past the end.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{LexError, LexErrorKind};

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Decimal number literal.
    Number,
    /// Double-quoted string literal; the lexeme excludes the quotes.
    String,
    /// Identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    Ident,
    /// One of `+ - * / % == != < <= > >= && || !`.
    Operator,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Ident => "IDENT",
            Self::Operator => "OPERATOR",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A lexical unit with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Raw text of the token.
    pub lexeme: String,
    /// Byte offset of the first character.
    pub position: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

/// Tokenize an expression.
///
/// # Errors
///
/// Returns [`LexError`] on a character that cannot start a token or on an
/// unterminated string literal.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Current byte offset (input length at end).
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let Some(&(start, ch)) = self.chars.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", self.input.len()));
        };

        match ch {
            '(' => {
                self.chars.next();
                Ok(Token::new(TokenKind::LParen, "(", start))
            }
            ')' => {
                self.chars.next();
                Ok(Token::new(TokenKind::RParen, ")", start))
            }
            '+' | '-' | '*' | '/' | '%' => {
                self.chars.next();
                Ok(Token::new(TokenKind::Operator, ch, start))
            }
            '<' | '>' | '!' => Ok(self.read_optional_eq(ch, start)),
            '=' | '&' | '|' => self.read_doubled(ch, start),
            '"' => self.read_string(start),
            c if c.is_ascii_digit() => Ok(self.read_number(start)),
            c if is_ident_start(c) => Ok(self.read_identifier(start)),
            _ => Err(LexError {
                position: start,
                kind: LexErrorKind::UnexpectedChar(ch),
            }),
        }
    }

    /// `<`, `>`, `!` optionally followed by `=`.
    fn read_optional_eq(&mut self, first: char, start: usize) -> Token {
        self.chars.next();
        if self.peek_char() == Some('=') {
            self.chars.next();
            Token::new(TokenKind::Operator, format!("{first}="), start)
        } else {
            Token::new(TokenKind::Operator, first, start)
        }
    }

    /// `==`, `&&`, `||`: `=` after `=`, otherwise the same character twice.
    fn read_doubled(&mut self, first: char, start: usize) -> Result<Token, LexError> {
        self.chars.next();
        if self.peek_char() == Some(first) {
            self.chars.next();
            Ok(Token::new(
                TokenKind::Operator,
                format!("{first}{first}"),
                start,
            ))
        } else {
            Err(LexError {
                position: start,
                kind: LexErrorKind::UnexpectedChar(first),
            })
        }
    }

    fn read_string(&mut self, start: usize) -> Result<Token, LexError> {
        let input = self.input;
        self.chars.next(); // consume opening quote
        for (i, c) in self.chars.by_ref() {
            if c == '"' {
                return Ok(Token::new(TokenKind::String, &input[start + 1..i], start));
            }
        }
        Err(LexError {
            position: start,
            kind: LexErrorKind::UnterminatedString,
        })
    }

    /// Digits, optional `.digits`, optional exponent `e[+-]digits`.
    ///
    /// A `.` or `e` that is not followed by a digit is left for the next token.
    fn read_number(&mut self, start: usize) -> Token {
        let input = self.input;
        self.consume_digits();

        let rest = &input[self.offset()..];
        if rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
            self.chars.next();
            self.consume_digits();
        }

        let rest = &input[self.offset()..];
        if let Some(exp) = rest.strip_prefix(['e', 'E']) {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                self.chars.next();
                if digits.len() < exp.len() {
                    self.chars.next();
                }
                self.consume_digits();
            }
        }

        let end = self.offset();
        Token::new(TokenKind::Number, &input[start..end], start)
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.chars.next();
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.peek_char().is_some_and(is_ident_continue) {
            self.chars.next();
        }
        let end = self.offset();
        Token::new(TokenKind::Ident, &self.input[start..end], start)
    }
}

/// Returns `true` if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns `true` if `c` can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    fn lexemes(input: &str) -> Vec<String> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.lexeme)
            .collect()
    }

    #[test]
    fn test_should_tokenize_arithmetic() {
        assert_eq!(
            kinds("2 + 3 * 4"),
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert_eq!(lexemes("2 + 3 * 4"), vec!["2", "+", "3", "*", "4", ""]);
    }

    #[test]
    fn test_should_record_byte_positions() {
        let tokens = tokenize("(12 +  x)").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 4, 7, 8, 9]);
    }

    #[test]
    fn test_should_tokenize_all_operators() {
        let input = "+ - * / % == != < <= > >= && || !";
        let ops: Vec<String> = tokenize(input)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.lexeme)
            .collect();
        assert_eq!(
            ops,
            vec![
                "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&&", "||", "!"
            ]
        );
    }

    #[test]
    fn test_should_tokenize_numbers_with_fraction_and_exponent() {
        assert_eq!(lexemes("3.25 1e3 2.5E-2 7e+1"), vec![
            "3.25", "1e3", "2.5E-2", "7e+1", ""
        ]);
    }

    #[test]
    fn test_should_leave_dangling_exponent_for_identifier() {
        let tokens = tokenize("2e").unwrap();
        assert_eq!(tokens[0].lexeme, "2");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].lexeme, "e");
    }

    #[test]
    fn test_should_reject_trailing_dot() {
        let err = tokenize("1.").unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar('.'));
    }

    #[test]
    fn test_should_tokenize_string_without_quotes() {
        let tokens = tokenize(r#""ab" + "c d""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "ab");
        assert_eq!(tokens[2].lexeme, "c d");
        assert_eq!(tokens[2].position, 7);
    }

    #[test]
    fn test_should_tokenize_multibyte_string() {
        let tokens = tokenize(r#""héllo" + 1"#).unwrap();
        assert_eq!(tokens[0].lexeme, "héllo");
        assert_eq!(tokens[1].position, 9);
    }

    #[test]
    fn test_should_error_on_unterminated_string() {
        let err = tokenize(r#"1 + "abc"#).unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn test_should_error_on_unexpected_char() {
        let err = tokenize("1 # 2").unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar('#'));
    }

    #[test]
    fn test_should_error_on_single_ampersand_and_equals() {
        assert_eq!(
            tokenize("a & b").unwrap_err().kind,
            LexErrorKind::UnexpectedChar('&')
        );
        assert_eq!(
            tokenize("a = b").unwrap_err().kind,
            LexErrorKind::UnexpectedChar('=')
        );
        assert_eq!(tokenize("a | b").unwrap_err().position, 2);
    }

    #[test]
    fn test_should_tokenize_identifiers() {
        let tokens = tokenize("_x1 true").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "_x1");
        assert_eq!(tokens[1].lexeme, "true");
    }

    #[test]
    fn test_should_always_end_with_eof() {
        let tokens = tokenize("   ").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].position, 3);
    }
}
