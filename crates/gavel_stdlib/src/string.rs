//! String functions.
//!
//! Lengths and indexes count characters, not bytes. A `nil` argument behaves
//! like the empty string.

use gavel_foundation::{Arity, Error, Result, Type, Value};

use crate::FunctionRegistry;

/// Registers every string function.
pub fn register(registry: &mut FunctionRegistry) {
    registry.define("Len", Arity::Exact(1), native_len);
    registry.define("ToUpper", Arity::Exact(1), native_to_upper);
    registry.define("ToLower", Arity::Exact(1), native_to_lower);
    registry.define("Trim", Arity::Exact(1), native_trim);
    registry.define("StrContains", Arity::Exact(2), native_contains);
    registry.define("StrHasPrefix", Arity::Exact(2), native_has_prefix);
    registry.define("StrHasSuffix", Arity::Exact(2), native_has_suffix);
    registry.define("StrIndex", Arity::Exact(2), native_index);
    registry.define("Concat", Arity::Variadic(0), native_concat);
    registry.define("ToString", Arity::Exact(1), native_to_string);
}

/// Reads a string argument, treating `nil` as empty.
fn string_arg(args: &[Value], index: usize) -> Result<&str> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Nil) | None => Ok(""),
        Some(other) => Err(Error::type_mismatch(Type::String, other.value_type())),
    }
}

fn native_len(args: &[Value]) -> Result<Value> {
    let count = string_arg(args, 0)?.chars().count();
    Ok(Value::Int(i64::try_from(count).unwrap_or(i64::MAX)))
}

fn native_to_upper(args: &[Value]) -> Result<Value> {
    Ok(string_arg(args, 0)?.to_uppercase().into())
}

fn native_to_lower(args: &[Value]) -> Result<Value> {
    Ok(string_arg(args, 0)?.to_lowercase().into())
}

fn native_trim(args: &[Value]) -> Result<Value> {
    Ok(string_arg(args, 0)?.trim().into())
}

fn native_contains(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(string_arg(args, 0)?.contains(string_arg(args, 1)?)))
}

fn native_has_prefix(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(string_arg(args, 0)?.starts_with(string_arg(args, 1)?)))
}

fn native_has_suffix(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(string_arg(args, 0)?.ends_with(string_arg(args, 1)?)))
}

/// Character index of the first occurrence, or -1.
fn native_index(args: &[Value]) -> Result<Value> {
    let haystack = string_arg(args, 0)?;
    let needle = string_arg(args, 1)?;
    let index = haystack
        .find(needle)
        .map_or(-1, |byte| {
            i64::try_from(haystack[..byte].chars().count()).unwrap_or(i64::MAX)
        });
    Ok(Value::Int(index))
}

fn native_concat(args: &[Value]) -> Result<Value> {
    let joined: String = args.iter().map(ToString::to_string).collect();
    Ok(joined.into())
}

fn native_to_string(args: &[Value]) -> Result<Value> {
    match args.first() {
        Some(value @ Value::String(_)) => Ok(value.clone()),
        Some(other) => Ok(other.to_string().into()),
        None => Ok(Value::from("nil")),
    }
}
