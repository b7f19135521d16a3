//! Math functions.
//!
//! Integer inputs stay integers where the result is exact; rounding functions
//! on floats return floats.

use std::cmp::Ordering;

use gavel_foundation::{Arity, Error, ErrorKind, Result, Type, Value};

use crate::FunctionRegistry;

/// Registers every math function.
pub fn register(registry: &mut FunctionRegistry) {
    registry.define("Abs", Arity::Exact(1), native_abs);
    registry.define("Min", Arity::Variadic(1), native_min);
    registry.define("Max", Arity::Variadic(1), native_max);
    registry.define("Floor", Arity::Exact(1), native_floor);
    registry.define("Ceil", Arity::Exact(1), native_ceil);
    registry.define("Round", Arity::Exact(1), native_round);
    registry.define("Pow", Arity::Exact(2), native_pow);
}

fn number_arg(args: &[Value], index: usize) -> Result<&Value> {
    match args.get(index) {
        Some(value) if value.is_numeric() => Ok(value),
        Some(other) => Err(Error::type_mismatch(Type::Number, other.value_type())),
        None => Err(Error::type_mismatch(Type::Number, Type::Nil)),
    }
}

fn native_abs(args: &[Value]) -> Result<Value> {
    match number_arg(args, 0)? {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| Error::new(ErrorKind::Overflow("Abs".to_string()))),
        other => Ok(Value::Float(other.as_number().unwrap_or_default().abs())),
    }
}

/// Keeps the argument that orders as `want` against all others.
///
/// The result is a float if any argument is a float.
fn fold_extreme(args: &[Value], want: Ordering) -> Result<Value> {
    let mut best = number_arg(args, 0)?;
    let mut any_float = matches!(best, Value::Float(_));
    for index in 1..args.len() {
        let candidate = number_arg(args, index)?;
        any_float |= matches!(candidate, Value::Float(_));
        if candidate.partial_cmp(best) == Some(want) {
            best = candidate;
        }
    }
    if any_float {
        Ok(Value::Float(best.as_number().unwrap_or_default()))
    } else {
        Ok(best.clone())
    }
}

fn native_min(args: &[Value]) -> Result<Value> {
    fold_extreme(args, Ordering::Less)
}

fn native_max(args: &[Value]) -> Result<Value> {
    fold_extreme(args, Ordering::Greater)
}

fn native_floor(args: &[Value]) -> Result<Value> {
    match number_arg(args, 0)? {
        Value::Float(n) => Ok(Value::Float(n.floor())),
        other => Ok(other.clone()),
    }
}

fn native_ceil(args: &[Value]) -> Result<Value> {
    match number_arg(args, 0)? {
        Value::Float(n) => Ok(Value::Float(n.ceil())),
        other => Ok(other.clone()),
    }
}

/// Rounds half away from zero.
fn native_round(args: &[Value]) -> Result<Value> {
    match number_arg(args, 0)? {
        Value::Float(n) => Ok(Value::Float(n.round())),
        other => Ok(other.clone()),
    }
}

/// Integer powers with a non-negative exponent stay integers.
fn native_pow(args: &[Value]) -> Result<Value> {
    let base = number_arg(args, 0)?;
    let exponent = number_arg(args, 1)?;
    if let (Value::Int(b), Value::Int(e)) = (base, exponent) {
        if let Ok(e) = u32::try_from(*e) {
            return b
                .checked_pow(e)
                .map(Value::Int)
                .ok_or_else(|| Error::new(ErrorKind::Overflow("Pow".to_string())));
        }
    }
    let b = base.as_number().unwrap_or_default();
    let e = exponent.as_number().unwrap_or_default();
    Ok(Value::Float(b.powf(e)))
}
