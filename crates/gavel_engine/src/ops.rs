//! Operator semantics for rule expressions.
//!
//! Arithmetic requires numeric operands; an `Int` combined with a `Float`
//! promotes to `Float`. Integer arithmetic is checked. `+` also concatenates
//! two strings.

#![allow(clippy::cast_precision_loss)]

use std::cmp::Ordering;

use gavel_foundation::{Error, ErrorKind, Result, Type, Value};
use gavel_language::{BinaryOp, UnaryOp};

/// Applies a non-logical binary operator to two evaluated operands.
///
/// `&&` and `||` short-circuit, so the evaluator handles them itself.
///
/// # Errors
/// Returns an error for incompatible operands, overflow, or division by zero.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => divide(op, left, right, i64::checked_div, |a, b| a / b),
        BinaryOp::Rem => divide(op, left, right, i64::checked_rem, |a, b| a % b),
        BinaryOp::Eq => equals(op, left, right).map(Value::Bool),
        BinaryOp::NotEq => equals(op, left, right).map(|eq| Value::Bool(!eq)),
        BinaryOp::Lt => compare(op, left, right, Ordering::is_lt),
        BinaryOp::Le => compare(op, left, right, Ordering::is_le),
        BinaryOp::Gt => compare(op, left, right, Ordering::is_gt),
        BinaryOp::Ge => compare(op, left, right, Ordering::is_ge),
        BinaryOp::And | BinaryOp::Or => {
            let lhs = expect_bool(left)?;
            let rhs = expect_bool(right)?;
            Ok(Value::Bool(if op == BinaryOp::And {
                lhs && rhs
            } else {
                lhs || rhs
            }))
        }
    }
}

/// Applies a prefix operator.
///
/// # Errors
/// Returns a type mismatch for a non-bool `!` operand or a non-numeric `-`
/// operand, or an overflow when negating `i64::MIN`.
pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value> {
    match (op, operand) {
        (UnaryOp::Not, value) => expect_bool(value).map(|b| Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| overflow("-")),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Neg, other) => Err(Error::type_mismatch(Type::Number, other.value_type())),
    }
}

/// Extracts a boolean or reports a type mismatch.
///
/// # Errors
/// Returns a type mismatch if the value is not a bool.
pub fn expect_bool(value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::type_mismatch(Type::Bool, value.value_type()))
}

fn overflow(operator: &str) -> Error {
    Error::new(ErrorKind::Overflow(operator.to_string()))
}

fn invalid(op: BinaryOp, left: &Value, right: &Value) -> Error {
    Error::invalid_operands(op.symbol(), left.value_type(), right.value_type())
}

fn add(left: &Value, right: &Value) -> Result<Value> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        let mut joined = String::with_capacity(a.len() + b.len());
        joined.push_str(a);
        joined.push_str(b);
        return Ok(joined.into());
    }
    arithmetic(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b)
}

fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| overflow(op.symbol())),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let (a, b) = promote(left, right);
            Ok(Value::Float(float_op(a, b)))
        }
        _ => Err(invalid(op, left, right)),
    }
}

fn divide(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    if let (Value::Int(_), Value::Int(0)) = (left, right) {
        return Err(Error::new(ErrorKind::DivisionByZero));
    }
    arithmetic(op, left, right, int_op, float_op)
}

fn promote(left: &Value, right: &Value) -> (f64, f64) {
    (
        left.as_number().unwrap_or_default(),
        right.as_number().unwrap_or_default(),
    )
}

/// Equality with numeric cross-comparison. `nil` compares with anything.
///
/// Mixed numbers compare as IEEE floats, so `-0.0 == 0` and `NaN != NaN`.
#[allow(clippy::float_cmp)]
fn equals(op: BinaryOp, left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::Nil, _) | (_, Value::Nil) => Ok(left == right),
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let (a, b) = promote(left, right);
            Ok(a == b)
        }
        (Value::Bool(_), Value::Bool(_))
        | (Value::String(_), Value::String(_))
        | (Value::Fact(_), Value::Fact(_)) => Ok(left == right),
        _ => Err(invalid(op, left, right)),
    }
}

fn compare(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    test: fn(Ordering) -> bool,
) -> Result<Value> {
    let comparable = (left.is_numeric() && right.is_numeric())
        || matches!((left, right), (Value::String(_), Value::String(_)));
    if !comparable {
        return Err(invalid(op, left, right));
    }
    Ok(Value::Bool(left.partial_cmp(right).is_some_and(test)))
}
