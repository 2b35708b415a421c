//! Runtime values and the operators defined on them.

use std::cmp::Ordering;
use std::fmt;

use crate::ast::{BinaryOp, UnaryOp};
use crate::eval::RuntimeErrorKind;

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn unary(&self, op: UnaryOp) -> Result<Value, RuntimeErrorKind> {
        match (op, self) {
            (UnaryOp::Minus, Value::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or(RuntimeErrorKind::IntegerOverflow),
            (UnaryOp::Minus, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            _ => Err(RuntimeErrorKind::InvalidOperandType {
                op: op.to_string(),
                operands: self.type_name().to_string(),
            }),
        }
    }

    pub fn binary(&self, op: BinaryOp, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
        match op {
            BinaryOp::Add => self.add(rhs),
            BinaryOp::Sub => self.arithmetic(op, rhs, i64::checked_sub, |l, r| l - r),
            BinaryOp::Mul => self.arithmetic(op, rhs, i64::checked_mul, |l, r| l * r),
            BinaryOp::Div => self.div(rhs),
            BinaryOp::And | BinaryOp::Or => self.logic(op, rhs),
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Less
            | BinaryOp::LessEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterEqual => self.compare(op, rhs),
        }
    }

    fn add(&self, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
        if let (Value::Str(l), Value::Str(r)) = (self, rhs) {
            let mut s = String::with_capacity(l.len() + r.len());
            s.push_str(l);
            s.push_str(r);
            return Ok(Value::Str(s));
        }
        self.arithmetic(BinaryOp::Add, rhs, i64::checked_add, |l, r| l + r)
    }

    /// Integer op Integer stays Integer, any Float operand promotes both sides.
    fn arithmetic(
        &self,
        op: BinaryOp,
        rhs: &Value,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value, RuntimeErrorKind> {
        if let (Value::Int(l), Value::Int(r)) = (self, rhs) {
            return int_op(*l, *r)
                .map(Value::Int)
                .ok_or(RuntimeErrorKind::IntegerOverflow);
        }
        match (self.as_float(), rhs.as_float()) {
            (Some(l), Some(r)) => finite(float_op(l, r)),
            _ => Err(self.mismatch(op, rhs)),
        }
    }

    /// Division always yields a Float.
    fn div(&self, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self.as_float(), rhs.as_float()) {
            (Some(_), Some(r)) if r == 0.0 => Err(RuntimeErrorKind::DivisionByZero),
            (Some(l), Some(r)) => finite(l / r),
            _ => Err(self.mismatch(BinaryOp::Div, rhs)),
        }
    }

    fn logic(&self, op: BinaryOp, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, rhs) {
            (Value::Bool(l), Value::Bool(r)) if op == BinaryOp::And => Ok(Value::Bool(*l && *r)),
            (Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(*l || *r)),
            _ => Err(self.mismatch(op, rhs)),
        }
    }

    fn compare(&self, op: BinaryOp, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
        let ord = match (self, rhs) {
            (Value::Int(l), Value::Int(r)) => Some(l.cmp(r)),
            (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
            (Value::Str(l), Value::Str(r)) => Some(l.cmp(r)),
            (Value::Int(l), Value::Float(r)) => cmp_int_float(*l, *r),
            (Value::Float(l), Value::Int(r)) => cmp_int_float(*r, *l).map(Ordering::reverse),
            (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
            _ => return Err(self.mismatch(op, rhs)),
        };
        // Unordered only for NaN, where everything but != is false.
        let res = match ord {
            None => op == BinaryOp::NotEqual,
            Some(ord) => match op {
                BinaryOp::Equal => ord == Ordering::Equal,
                BinaryOp::NotEqual => ord != Ordering::Equal,
                BinaryOp::Less => ord == Ordering::Less,
                BinaryOp::LessEqual => ord != Ordering::Greater,
                BinaryOp::Greater => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            },
        };
        Ok(Value::Bool(res))
    }

    fn mismatch(&self, op: BinaryOp, rhs: &Value) -> RuntimeErrorKind {
        RuntimeErrorKind::InvalidOperandType {
            op: op.to_string(),
            operands: format!("{} and {}", self.type_name(), rhs.type_name()),
        }
    }
}

/// Float results must stay finite so that they still render with a decimal point.
fn finite(n: f64) -> Result<Value, RuntimeErrorKind> {
    if n.is_finite() {
        Ok(Value::Float(n))
    } else {
        Err(RuntimeErrorKind::FloatOverflow)
    }
}

/// Exact ordering of an integer against a float, without rounding the integer to `f64`.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63 is exactly representable, so the bounds are exact too.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        None
    } else if f >= LIMIT {
        Some(Ordering::Less)
    } else if f < -LIMIT {
        Some(Ordering::Greater)
    } else {
        let whole = f.trunc();
        let ord = i.cmp(&(whole as i64)).then_with(|| {
            if f > whole {
                Ordering::Less
            } else if f < whole {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
        Some(ord)
    }
}

/// Rendering used by `print`.  Floats always carry a decimal point.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{:.1}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    #[test]
    fn integer_arithmetic_stays_integer() -> Result<(), RuntimeErrorKind> {
        assert_eq!(Value::Int(2).binary(BinaryOp::Add, &Value::Int(3))?, Value::Int(5));
        assert_eq!(Value::Int(2).binary(BinaryOp::Sub, &Value::Int(3))?, Value::Int(-1));
        assert_eq!(Value::Int(2).binary(BinaryOp::Mul, &Value::Int(3))?, Value::Int(6));
        Ok(())
    }

    #[test]
    fn mixed_arithmetic_promotes_to_float() -> Result<(), RuntimeErrorKind> {
        assert_eq!(
            Value::Int(1).binary(BinaryOp::Add, &Value::Float(2.0))?,
            Value::Float(3.0)
        );
        assert_eq!(
            Value::Float(1.5).binary(BinaryOp::Mul, &Value::Int(2))?,
            Value::Float(3.0)
        );
        Ok(())
    }

    #[test]
    fn division_yields_float() -> Result<(), RuntimeErrorKind> {
        assert_eq!(Value::Int(7).binary(BinaryOp::Div, &Value::Int(2))?, Value::Float(3.5));
        assert_eq!(Value::Int(6).binary(BinaryOp::Div, &Value::Int(3))?, Value::Float(2.0));
        Ok(())
    }

    #[test]
    fn division_by_zero() {
        for zero in [Value::Int(0), Value::Float(0.0)] {
            match Value::Int(1).binary(BinaryOp::Div, &zero) {
                Err(RuntimeErrorKind::DivisionByZero) => (),
                r => panic!("unexpected output: {:?}", r),
            }
        }
    }

    #[test]
    fn integer_overflow() {
        match Value::Int(i64::MAX).binary(BinaryOp::Add, &Value::Int(1)) {
            Err(RuntimeErrorKind::IntegerOverflow) => (),
            r => panic!("unexpected output: {:?}", r),
        }
        match Value::Int(i64::MIN).unary(UnaryOp::Minus) {
            Err(RuntimeErrorKind::IntegerOverflow) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn float_overflow() {
        let big = Value::Float(1e308);
        for op in [BinaryOp::Mul, BinaryOp::Add] {
            match big.binary(op, &big) {
                Err(RuntimeErrorKind::FloatOverflow) => (),
                r => panic!("unexpected output: {:?}", r),
            }
        }
        match big.binary(BinaryOp::Div, &Value::Float(1e-10)) {
            Err(RuntimeErrorKind::FloatOverflow) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn string_concatenation() -> Result<(), RuntimeErrorKind> {
        assert_eq!(str("foo").binary(BinaryOp::Add, &str("bar"))?, str("foobar"));
        Ok(())
    }

    #[test]
    fn string_plus_number_is_type_error() {
        match str("foo").binary(BinaryOp::Add, &Value::Int(1)) {
            Err(RuntimeErrorKind::InvalidOperandType { op, operands }) => {
                assert_eq!(op, "+");
                assert_eq!(operands, "string and integer");
            }
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn strings_cannot_be_subtracted() {
        assert!(str("a").binary(BinaryOp::Sub, &str("b")).is_err());
    }

    #[test]
    fn comparisons() -> Result<(), RuntimeErrorKind> {
        assert_eq!(Value::Int(1).binary(BinaryOp::Equal, &Value::Int(1))?, Value::Bool(true));
        assert_eq!(Value::Int(1).binary(BinaryOp::Equal, &Value::Float(1.0))?, Value::Bool(true));
        assert_eq!(Value::Int(1).binary(BinaryOp::Less, &Value::Float(1.5))?, Value::Bool(true));
        assert_eq!(str("a").binary(BinaryOp::Less, &str("b"))?, Value::Bool(true));
        assert_eq!(str("a").binary(BinaryOp::NotEqual, &str("a"))?, Value::Bool(false));
        assert_eq!(
            Value::Bool(false).binary(BinaryOp::Less, &Value::Bool(true))?,
            Value::Bool(true)
        );
        assert_eq!(Value::Int(3).binary(BinaryOp::GreaterEqual, &Value::Int(3))?, Value::Bool(true));
        assert_eq!(Value::Int(3).binary(BinaryOp::LessEqual, &Value::Int(2))?, Value::Bool(false));
        Ok(())
    }

    #[test]
    fn integer_float_comparison_is_exact() -> Result<(), RuntimeErrorKind> {
        let i = Value::Int(9_007_199_254_740_993);
        let f = Value::Float(9_007_199_254_740_992.0);
        assert_eq!(i.binary(BinaryOp::Equal, &f)?, Value::Bool(false));
        assert_eq!(i.binary(BinaryOp::Greater, &f)?, Value::Bool(true));
        assert_eq!(f.binary(BinaryOp::Less, &i)?, Value::Bool(true));
        assert_eq!(Value::Int(-1).binary(BinaryOp::Greater, &Value::Float(-1.5))?, Value::Bool(true));
        assert_eq!(Value::Float(2.5).binary(BinaryOp::Greater, &Value::Int(2))?, Value::Bool(true));
        assert_eq!(
            Value::Int(i64::MAX).binary(BinaryOp::Less, &Value::Float(9.3e18))?,
            Value::Bool(true)
        );
        assert_eq!(
            Value::Int(i64::MIN).binary(BinaryOp::Equal, &Value::Float(-9_223_372_036_854_775_808.0))?,
            Value::Bool(true)
        );
        Ok(())
    }

    #[test]
    fn comparing_incompatible_types_is_type_error() {
        assert!(str("a").binary(BinaryOp::Equal, &Value::Bool(true)).is_err());
        assert!(Value::Int(1).binary(BinaryOp::Less, &str("1")).is_err());
    }

    #[test]
    fn logic_requires_booleans() -> Result<(), RuntimeErrorKind> {
        assert_eq!(
            Value::Bool(true).binary(BinaryOp::And, &Value::Bool(false))?,
            Value::Bool(false)
        );
        assert_eq!(
            Value::Bool(true).binary(BinaryOp::Or, &Value::Bool(false))?,
            Value::Bool(true)
        );
        assert!(Value::Int(1).binary(BinaryOp::And, &Value::Bool(true)).is_err());
        Ok(())
    }

    #[test]
    fn unary_operators() -> Result<(), RuntimeErrorKind> {
        assert_eq!(Value::Int(4).unary(UnaryOp::Minus)?, Value::Int(-4));
        assert_eq!(Value::Float(0.5).unary(UnaryOp::Minus)?, Value::Float(-0.5));
        assert_eq!(Value::Bool(true).unary(UnaryOp::Not)?, Value::Bool(false));
        assert!(str("x").unary(UnaryOp::Minus).is_err());
        assert!(Value::Int(1).unary(UnaryOp::Not).is_err());
        Ok(())
    }

    #[test]
    fn rendering() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(-0.25).to_string(), "-0.25");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(str("raw text").to_string(), "raw text");
    }
}
