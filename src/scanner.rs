//! Lexical analyzer

use std::iter::Peekable;
use std::str::Chars;

use crate::diag::{LexError, LexErrorKind, Position};
use crate::token::{self, Token};

/// Turn source text into a sequence of tokens.
///
/// Tokens are produced on demand.  The sequence always ends with `Token::Eof` unless an error is
/// hit first, after which the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    input: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
    finished: bool,

    // Buffer used when scanning longer tokens.  Allocated here to reuse memory.
    buf: String,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner operating on `source`.
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            input: source.chars().peekable(),
            line: 1,
            column: 1,
            finished: false,
            buf: String::new(),
        }
    }

    /// Rewind to the start of the source text.
    pub fn restart(&mut self) {
        self.input = self.source.chars().peekable();
        self.line = 1;
        self.column = 1;
        self.finished = false;
    }

    /// Scan next token and return it with the position of its first character.
    pub fn get_token(&mut self) -> Result<(Position, Token), LexError> {
        loop {
            let start = self.current_pos();
            let ch = match self.bump() {
                None => return Ok((start, Token::Eof)),
                Some(ch) => ch,
            };
            let token = match ch {
                '\n' => Token::Newline,
                ' ' | '\t' | '\r' => continue,
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => {
                    if self.input.peek() == Some(&'/') {
                        self.skip_comment();
                        continue;
                    }
                    Token::Slash
                }
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                ';' => Token::Semicolon,
                '=' => self.either('=', Token::EqualEqual, Token::Equal),
                '!' => self.either('=', Token::BangEqual, Token::Bang),
                '<' => self.either('=', Token::LessEqual, Token::Less),
                '>' => self.either('=', Token::GreaterEqual, Token::Greater),
                '"' => self.scan_string(start)?,
                '0'..='9' => self.scan_number(ch, start)?,
                'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(ch),
                _ => {
                    return Err(LexError {
                        pos: start,
                        kind: LexErrorKind::InvalidCharacter(ch),
                    })
                }
            };
            return Ok((start, token));
        }
    }

    fn current_pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.input.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Longest match for two-character operators.
    fn either(&mut self, second: char, long: Token, short: Token) -> Token {
        if self.input.peek() == Some(&second) {
            self.bump();
            long
        } else {
            short
        }
    }

    fn scan_number(&mut self, first_digit: char, start: Position) -> Result<Token, LexError> {
        self.buf.clear();
        self.buf.push(first_digit);
        self.take_digits();

        if self.input.peek() == Some(&'.') && self.digit_after_dot() {
            self.bump();
            self.buf.push('.');
            self.take_digits();
            return match self.buf.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Token::Float(n)),
                _ => Err(self.bad_number(start)),
            };
        }

        let n = self.buf.parse::<i64>().map_err(|_| self.bad_number(start))?;
        Ok(Token::Integer(n))
    }

    fn take_digits(&mut self) {
        while let Some(ch) = self.input.peek().copied() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.bump();
            self.buf.push(ch);
        }
    }

    fn digit_after_dot(&self) -> bool {
        let mut ahead = self.input.clone();
        ahead.next();
        matches!(ahead.peek(), Some(ch) if ch.is_ascii_digit())
    }

    fn bad_number(&self, start: Position) -> LexError {
        LexError {
            pos: start,
            kind: LexErrorKind::InvalidNumber(self.buf.clone()),
        }
    }

    /// Opening quote already consumed.  Strings may not span lines.
    fn scan_string(&mut self, start: Position) -> Result<Token, LexError> {
        self.buf.clear();
        loop {
            match self.input.peek().copied() {
                Some('"') => {
                    self.bump();
                    return Ok(Token::Str(self.buf.clone()));
                }
                Some('\n') | None => {
                    return Err(LexError {
                        pos: start,
                        kind: LexErrorKind::UnterminatedString,
                    })
                }
                Some(ch) => {
                    self.bump();
                    self.buf.push(ch);
                }
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.input.peek() {
            if *ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn scan_identifier(&mut self, first_char: char) -> Token {
        self.buf.clear();
        self.buf.push(first_char);
        while let Some(ch) = self.input.peek().copied() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            self.bump();
            self.buf.push(ch);
        }

        token::keyword(&self.buf).unwrap_or_else(|| Token::Identifier(self.buf.clone()))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<(Position, Token), LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let res = self.get_token();
        if matches!(res, Ok((_, Token::Eof)) | Err(_)) {
            self.finished = true;
        }
        Some(res)
    }
}
