use thiserror::Error;
use tracing::debug;

use crate::ast::{BinaryOp, Expr, Program, Stmt, StmtKind, UnaryOp};
use crate::diag::{LexError, ParseError, ParseErrorKind, Position};
use crate::scanner::Scanner;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug, PartialEq, Error)]
pub enum ParserError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ParserError {
    pub fn pos(&self) -> Position {
        match self {
            ParserError::Lex(e) => e.pos,
            ParserError::Parse(e) => e.pos,
        }
    }
}

/// Recursive descent parser.  One token of lookahead past the current one is available to tell
/// assignments from expression statements.
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current_token: Token,
    current_pos: Position,
    peeked: Option<(Position, Token)>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Parser<'a> {
        Parser {
            scanner: Scanner::new(source),
            current_token: Token::Eof, // we haven't scanned anything yet
            current_pos: Position::default(),
            peeked: None,
        }
    }

    /// Parse the whole source.  Nothing is returned unless every statement parses.
    pub fn parse_program(&mut self) -> Result<Program, ParserError> {
        let mut prg = vec![];
        self.advance()?;
        loop {
            match self.current_token {
                Token::Eof => break,
                Token::Newline | Token::Semicolon => {
                    self.advance()?;
                }
                _ => {
                    prg.push(self.statement()?);
                    self.end_of_statement()?;
                }
            }
        }
        debug!(statements = prg.len(), "parsed program");
        Ok(prg)
    }

    /// Parse a single expression spanning the whole source.
    pub fn parse_expression(&mut self) -> Result<Expr, ParserError> {
        self.advance()?;
        let expr = self.expression()?;
        if self.current_token != Token::Eof {
            return Err(self.expected("end of input"));
        }
        Ok(expr)
    }

    fn statement(&mut self) -> Result<Stmt, ParserError> {
        let line = self.current_pos.line;
        let is_assignment =
            matches!(self.current_token, Token::Identifier(_)) && self.peek()? == &Token::Equal;
        let kind = match self.current_token.clone() {
            Token::Print => {
                self.advance()?;
                if self.current_token != Token::LeftParen {
                    return Err(self.expected("("));
                }
                self.advance()?;
                let expr = self.expression()?;
                self.close_paren()?;
                StmtKind::Print(Box::new(expr))
            }
            Token::Identifier(name) if is_assignment => {
                self.advance()?;
                self.advance()?;
                StmtKind::Assign(name, Box::new(self.expression()?))
            }
            _ => StmtKind::Expr(Box::new(self.expression()?)),
        };
        Ok(Stmt::new(line, kind))
    }

    fn end_of_statement(&mut self) -> Result<(), ParserError> {
        match self.current_token {
            Token::Newline | Token::Semicolon => {
                self.advance()?;
                Ok(())
            }
            Token::Eof => Ok(()),
            Token::RightParen => Err(self.unmatched_paren()),
            _ => Err(self.expected("end of statement")),
        }
    }

    fn expression(&mut self) -> Result<Expr, ParserError> {
        self.logic_or()
    }

    fn logic_or(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.logic_and()?;
        while self.current_token == Token::Or {
            self.advance()?;
            expr = Expr::binary(expr, BinaryOp::Or, self.logic_and()?);
        }
        Ok(expr)
    }

    fn logic_and(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.equality()?;
        while self.current_token == Token::And {
            self.advance()?;
            expr = Expr::binary(expr, BinaryOp::And, self.equality()?);
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.comparison()?;
        loop {
            let op = match self.current_token {
                Token::EqualEqual => BinaryOp::Equal,
                Token::BangEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance()?;
            expr = Expr::binary(expr, op, self.comparison()?);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.term()?;
        loop {
            let op = match self.current_token {
                Token::Less => BinaryOp::Less,
                Token::LessEqual => BinaryOp::LessEqual,
                Token::Greater => BinaryOp::Greater,
                Token::GreaterEqual => BinaryOp::GreaterEqual,
                _ => break,
            };
            self.advance()?;
            expr = Expr::binary(expr, op, self.term()?);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.factor()?;
        loop {
            let op = match self.current_token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            expr = Expr::binary(expr, op, self.factor()?);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.unary()?;
        loop {
            let op = match self.current_token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance()?;
            expr = Expr::binary(expr, op, self.unary()?);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParserError> {
        let op = match self.current_token {
            Token::Minus => UnaryOp::Minus,
            Token::Bang | Token::Not => UnaryOp::Not,
            _ => return self.primary(),
        };
        self.advance()?;
        Ok(Expr::unary(op, self.unary()?))
    }

    fn primary(&mut self) -> Result<Expr, ParserError> {
        let expr = match self.current_token.clone() {
            Token::Identifier(name) => Expr::Var(name),
            Token::Integer(n) => Expr::Literal(Value::Int(n)),
            Token::Float(n) => Expr::Literal(Value::Float(n)),
            Token::Str(s) => Expr::Literal(Value::Str(s)),
            Token::True => Expr::Literal(Value::Bool(true)),
            Token::False => Expr::Literal(Value::Bool(false)),
            Token::LeftParen => {
                self.advance()?;
                let expr = self.expression()?;
                self.close_paren()?;
                return Ok(expr);
            }
            Token::RightParen => return Err(self.unmatched_paren()),
            t => {
                return Err(self.error(ParseErrorKind::UnexpectedToken(
                    t.to_string(),
                    "expression",
                )))
            }
        };
        self.advance()?;
        Ok(expr)
    }

    /// Consume the `)` closing a group or a print argument.
    fn close_paren(&mut self) -> Result<(), ParserError> {
        match self.current_token {
            Token::RightParen => {
                self.advance()?;
                Ok(())
            }
            Token::Newline | Token::Semicolon | Token::Eof => Err(self.unmatched_paren()),
            _ => Err(self.expected(")")),
        }
    }

    fn advance(&mut self) -> Result<&Token, ParserError> {
        let (pos, token) = match self.peeked.take() {
            Some(next) => next,
            None => self.scanner.get_token()?,
        };
        self.current_token = token;
        self.current_pos = pos;
        Ok(&self.current_token)
    }

    /// Token following the current one.
    fn peek(&mut self) -> Result<&Token, ParserError> {
        let next = match self.peeked.take() {
            Some(next) => next,
            None => self.scanner.get_token()?,
        };
        let (_, token) = self.peeked.insert(next);
        Ok(token)
    }

    fn error(&self, kind: ParseErrorKind) -> ParserError {
        ParserError::Parse(ParseError {
            pos: self.current_pos,
            kind,
        })
    }

    fn expected(&self, expected: &'static str) -> ParserError {
        self.error(ParseErrorKind::ExpectedButFound {
            expected,
            found: self.current_token.to_string(),
        })
    }

    fn unmatched_paren(&self) -> ParserError {
        self.error(ParseErrorKind::UnmatchedParenthesis(
            self.current_token.to_string(),
        ))
    }
}
