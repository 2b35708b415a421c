//! API to control the interpreter.

use std::io::prelude::*;

use tracing::debug;

use crate::ast::Program;
use crate::diag::{LexError, Position};
use crate::env::Env;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::{Parser, ParserError};
use crate::scanner::Scanner;
use crate::token::Token;
use crate::value::Value;

/// Tree-walk interpreter.
///
/// Every call to [`Interpreter::eval`] runs against the same variables, so a session can be fed
/// one line at a time.
///
/// # Example
///
/// ```
/// # use teachlang::interpreter::{Interpreter, Error};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.eval("x = 2 + 3 * 4")?;
/// interp.eval("print(x)\nprint(x / 4)")?;
///
/// assert_eq!(output, b"14\n3.5\n");
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error occurring during lexical or syntactic analysis.
    #[error(transparent)]
    Parse(#[from] ParserError),

    /// Error occurring during evaluation.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Name of the error class: `LexError`, `ParseError`, `NameError`, `TypeError`,
    /// `ArithmeticError` or `IoError`.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Parse(ParserError::Lex(_)) => "LexError",
            Error::Parse(ParserError::Parse(_)) => "ParseError",
            Error::Runtime(e) => e.kind.category(),
        }
    }

    /// Source line the error refers to.
    pub fn line(&self) -> u32 {
        match self {
            Error::Parse(e) => e.pos().line,
            Error::Runtime(e) => e.line,
        }
    }
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Error {
        Error::Parse(ParserError::Lex(e))
    }
}

impl<'t, W: Write> Interpreter<'t, W> {
    pub fn new(output: &'t mut W) -> Interpreter<'t, W> {
        Interpreter {
            evaluator: Evaluator::new(output),
        }
    }

    /// Parse `source` entirely, then run it.  Nothing runs if parsing fails.
    ///
    /// Returns the value of the last statement when it is a bare expression.
    pub fn eval(&mut self, source: &str) -> Result<Option<Value>, Error> {
        let prg = parse(source)?;
        Ok(self.evaluator.eval_program(&prg)?)
    }

    pub fn env(&self) -> &Env {
        self.evaluator.env()
    }
}

/// Run `source` on fresh variables and return them once the program completes.
pub fn run<W: Write>(source: &str, output: &mut W) -> Result<Env, Error> {
    let mut interp = Interpreter::new(output);
    interp.eval(source)?;
    Ok(interp.evaluator.into_env())
}

/// Run `source` and collect its printed lines.
pub fn run_to_lines(source: &str) -> Result<Vec<String>, Error> {
    let mut out: Vec<u8> = Vec::new();
    run(source, &mut out)?;
    Ok(String::from_utf8_lossy(&out)
        .lines()
        .map(str::to_owned)
        .collect())
}

pub fn parse(source: &str) -> Result<Program, ParserError> {
    Parser::new(source).parse_program()
}

/// Scan `source` up to and including the final `Token::Eof`.
pub fn tokenize(source: &str) -> Result<Vec<(Position, Token)>, LexError> {
    let tokens = Scanner::new(source).collect::<Result<Vec<_>, LexError>>()?;
    debug!(tokens = tokens.len(), "scanned source");
    Ok(tokens)
}
