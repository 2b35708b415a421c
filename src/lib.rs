//! Interpreter for a small teaching language: numbers, booleans, strings, variables and `print`.
//!
//! ```text
//! greeting = "hello, " + "world"
//! print(greeting)
//! print((2 + 3) * 4 / 8)   // 2.5
//! ```
//!
//! Statements end at a newline or `;`.  Source text goes through the [`scanner`], the
//! [`parser`] and finally the [`eval`]uator, which owns the program variables.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - The scanner and parser do not attempt any error recovery.  They bail out on the first
//! encountered error and nothing of the program runs.
//! - String literals have no escape sequences, so they cannot contain `"`.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod diag;
pub mod env;
pub mod eval;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

pub use interpreter::{parse, run, run_to_lines, tokenize, Error, Interpreter};
pub use value::Value;
