//! Diagnostics raised by the scanner and the parser.

use std::fmt;

use thiserror::Error;

/// Location in the source text, both starting at one.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, PartialEq, Error)]
#[error("lex error: {pos}: {kind}")]
pub struct LexError {
    pub pos: Position,
    pub kind: LexErrorKind,
}

#[derive(Debug, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid character: {0:?}")]
    InvalidCharacter(char),
    #[error("invalid number literal: {0}")]
    InvalidNumber(String),
}

#[derive(Debug, PartialEq, Error)]
#[error("parse error: {pos}: {kind}")]
pub struct ParseError {
    pub pos: Position,
    pub kind: ParseErrorKind,
}

#[derive(Debug, PartialEq, Error)]
pub enum ParseErrorKind {
    /// A token that cannot start the construct being parsed.
    #[error("unexpected token '{0}', expected {1}")]
    UnexpectedToken(String, &'static str),

    /// A specific token was required.
    #[error("expected '{expected}' but found '{found}'")]
    ExpectedButFound {
        expected: &'static str,
        found: String,
    },

    #[error("unmatched parenthesis, found '{0}'")]
    UnmatchedParenthesis(String),
}
