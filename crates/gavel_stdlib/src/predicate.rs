//! Predicate functions: nil, zero, and type checks.

use gavel_foundation::{Arity, Result, Value};

use crate::FunctionRegistry;

/// Registers every predicate function.
pub fn register(registry: &mut FunctionRegistry) {
    registry.define("IsNil", Arity::Exact(1), native_is_nil);
    registry.define("IsZero", Arity::Exact(1), native_is_zero);
    registry.define("IsNumber", Arity::Exact(1), native_is_number);
    registry.define("IsString", Arity::Exact(1), native_is_string);
    registry.define("IsBool", Arity::Exact(1), native_is_bool);
}

fn native_is_nil(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args.first().is_none_or(Value::is_nil)))
}

/// True for nil, `0`, `0.0`, `false`, and the empty string.
#[allow(clippy::float_cmp)]
fn native_is_zero(args: &[Value]) -> Result<Value> {
    let zero = match args.first() {
        None | Some(Value::Nil) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Int(n)) => *n == 0,
        Some(Value::Float(n)) => *n == 0.0,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Fact(_)) => false,
    };
    Ok(Value::Bool(zero))
}

fn native_is_number(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args.first().is_some_and(Value::is_numeric)))
}

fn native_is_string(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::String(_)))))
}

fn native_is_bool(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Bool(_)))))
}
