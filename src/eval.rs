use std::io;
use std::io::prelude::*;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{Expr, Stmt, StmtKind};
use crate::env::Env;
use crate::value::Value;

/// Walks a parsed program, writing `print` output to `output`.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    env: Env,
}

/// Error raised while evaluating a statement, tagged with the statement line.
#[derive(Debug, Error)]
#[error("runtime error: line {line}: {kind}")]
pub struct RuntimeError {
    pub line: u32,
    pub kind: RuntimeErrorKind,
}

#[derive(Debug, Error)]
pub enum RuntimeErrorKind {
    #[error("name error: undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("type error: unsupported operand type(s) for '{op}': {operands}")]
    InvalidOperandType { op: String, operands: String },

    #[error("arithmetic error: division by zero")]
    DivisionByZero,

    #[error("arithmetic error: integer overflow")]
    IntegerOverflow,

    #[error("arithmetic error: float overflow")]
    FloatOverflow,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RuntimeErrorKind {
    /// Short classification string.
    pub fn category(&self) -> &'static str {
        match self {
            RuntimeErrorKind::UndefinedVariable(_) => "NameError",
            RuntimeErrorKind::InvalidOperandType { .. } => "TypeError",
            RuntimeErrorKind::DivisionByZero
            | RuntimeErrorKind::IntegerOverflow
            | RuntimeErrorKind::FloatOverflow => "ArithmeticError",
            RuntimeErrorKind::Io(_) => "IoError",
        }
    }
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(output: &'a mut W) -> Evaluator<'a, W> {
        Evaluator {
            output,
            env: Env::new(),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn into_env(self) -> Env {
        self.env
    }

    /// Run statements in order, stopping at the first error.
    ///
    /// Returns the value of the last statement when it is an expression statement.
    pub fn eval_program(&mut self, prg: &[Stmt]) -> Result<Option<Value>, RuntimeError> {
        debug!(statements = prg.len(), "evaluating program");
        let mut last = None;
        for stmt in prg {
            last = self
                .eval_stmt(stmt)
                .map_err(|kind| RuntimeError {
                    line: stmt.line,
                    kind,
                })?;
        }
        Ok(last)
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Option<Value>, RuntimeErrorKind> {
        match &stmt.kind {
            StmtKind::Expr(e) => Ok(Some(self.eval_expr(e)?)),
            StmtKind::Print(e) => {
                let v = self.eval_expr(e)?;
                writeln!(self.output, "{}", v)?;
                Ok(None)
            }
            StmtKind::Assign(name, init) => {
                let v = self.eval_expr(init)?;
                trace!(line = stmt.line, %name, value = %v, "assign");
                self.env.set(name, v);
                Ok(None)
            }
        }
    }

    /// Operands are evaluated left to right, all of them, before the operator applies.
    pub fn eval_expr(&self, expr: &Expr) -> Result<Value, RuntimeErrorKind> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Var(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeErrorKind::UndefinedVariable(name.clone())),
            Expr::Unary(op, operand) => self.eval_expr(operand)?.unary(*op),
            Expr::Binary(lhs, op, rhs) => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                l.binary(*op, &r)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, UnaryOp};

    fn int(n: i64) -> Expr {
        Expr::Literal(Value::Int(n))
    }

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    fn stmt(line: u32, kind: StmtKind) -> Stmt {
        Stmt::new(line, kind)
    }

    fn print(e: Expr) -> StmtKind {
        StmtKind::Print(Box::new(e))
    }

    fn assign(name: &str, e: Expr) -> StmtKind {
        StmtKind::Assign(name.to_string(), Box::new(e))
    }

    fn eval_expr(expr: &Expr) -> Result<Value, RuntimeErrorKind> {
        let mut out: Vec<u8> = Vec::new();
        let evaluator = Evaluator::new(&mut out);
        let val = evaluator.eval_expr(expr)?;
        assert!(out.is_empty());
        Ok(val)
    }

    fn eval_prg(prg: &[Stmt]) -> Result<String, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out);
        e.eval_program(prg)?;
        Ok(String::from_utf8(out).expect("error while converting output"))
    }

    #[test]
    fn literal() -> Result<(), RuntimeErrorKind> {
        assert_eq!(eval_expr(&int(1))?, Value::Int(1));
        Ok(())
    }

    #[test]
    fn unary_minus() -> Result<(), RuntimeErrorKind> {
        assert_eq!(
            eval_expr(&Expr::unary(UnaryOp::Minus, int(1)))?,
            Value::Int(-1)
        );
        Ok(())
    }

    #[test]
    fn unary_minus_on_bool() {
        match eval_expr(&Expr::unary(
            UnaryOp::Minus,
            Expr::Literal(Value::Bool(true)),
        )) {
            Err(RuntimeErrorKind::InvalidOperandType { .. }) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn nested_binary() -> Result<(), RuntimeErrorKind> {
        let e = Expr::binary(
            int(2),
            BinaryOp::Add,
            Expr::binary(int(3), BinaryOp::Mul, int(4)),
        );
        assert_eq!(eval_expr(&e)?, Value::Int(14));
        Ok(())
    }

    #[test]
    fn undefined_variable() {
        match eval_expr(&var("y")) {
            Err(RuntimeErrorKind::UndefinedVariable(name)) if name == "y" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn left_operand_error_wins() {
        let e = Expr::binary(var("a"), BinaryOp::Add, var("b"));
        match eval_expr(&e) {
            Err(RuntimeErrorKind::UndefinedVariable(name)) if name == "a" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn print_stmt() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_prg(&[stmt(1, print(Expr::binary(int(1), BinaryOp::Add, int(2))))])?,
            "3\n"
        );
        Ok(())
    }

    #[test]
    fn assign_then_read() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_prg(&[stmt(1, assign("x", int(5))), stmt(2, print(var("x")))])?,
            "5\n"
        );
        Ok(())
    }

    #[test]
    fn reassign_uses_previous_value() -> Result<(), RuntimeError> {
        let prg = [
            stmt(1, assign("x", int(1))),
            stmt(2, assign("x", Expr::binary(var("x"), BinaryOp::Add, int(1)))),
            stmt(3, print(var("x"))),
        ];
        assert_eq!(eval_prg(&prg)?, "2\n");
        Ok(())
    }

    #[test]
    fn failed_assignment_does_not_bind() {
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out);
        let prg = [stmt(1, assign("x", Expr::binary(int(1), BinaryOp::Div, int(0))))];
        assert!(e.eval_program(&prg).is_err());
        assert!(e.env().get("x").is_none());
    }

    #[test]
    fn error_carries_statement_line() {
        let prg = [
            stmt(1, print(int(1))),
            stmt(4, print(Expr::binary(int(10), BinaryOp::Div, int(0)))),
            stmt(5, print(int(2))),
        ];
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out);
        match e.eval_program(&prg) {
            Err(RuntimeError {
                line: 4,
                kind: RuntimeErrorKind::DivisionByZero,
            }) => (),
            r => panic!("unexpected output: {:?}", r),
        }
        assert_eq!(out, b"1\n");
    }

    #[test]
    fn last_expression_value_is_returned() -> Result<(), RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out);
        assert_eq!(
            e.eval_program(&[stmt(1, assign("x", int(2))), stmt(2, StmtKind::Expr(Box::new(var("x"))))])?,
            Some(Value::Int(2))
        );
        assert_eq!(e.eval_program(&[stmt(1, print(int(1)))])?, None);
        Ok(())
    }

    #[test]
    fn env_survives_across_programs() -> Result<(), RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out);
        e.eval_program(&[stmt(1, assign("x", int(7)))])?;
        e.eval_program(&[stmt(1, print(var("x")))])?;
        let env = e.into_env();
        assert_eq!(env.get("x"), Some(&Value::Int(7)));
        assert_eq!(out, b"7\n");
        Ok(())
    }

    #[test]
    fn categories() {
        assert_eq!(
            RuntimeErrorKind::UndefinedVariable("x".to_string()).category(),
            "NameError"
        );
        assert_eq!(RuntimeErrorKind::DivisionByZero.category(), "ArithmeticError");
        assert_eq!(RuntimeErrorKind::FloatOverflow.category(), "ArithmeticError");
    }
}
