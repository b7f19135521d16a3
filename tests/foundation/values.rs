//! Integration tests for Value and Type
//!
//! Tests type reporting, accessors, equality, and display.

use gavel_foundation::{Type, Value};

#[test]
fn value_types() {
    assert_eq!(Value::Nil.value_type(), Type::Nil);
    assert_eq!(Value::from(true).value_type(), Type::Bool);
    assert_eq!(Value::from(1_i64).value_type(), Type::Int);
    assert_eq!(Value::from(1.5).value_type(), Type::Float);
    assert_eq!(Value::from("s").value_type(), Type::String);
}

#[test]
fn accessors() {
    assert_eq!(Value::Int(7).as_int(), Some(7));
    assert_eq!(Value::Int(7).as_number(), Some(7.0));
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::Bool(true).as_bool(), Some(true));
    assert!(Value::Nil.is_nil());
    assert!(Value::Float(0.5).is_numeric());
    assert!(Value::from("1").as_int().is_none());
}

#[test]
fn option_conversion() {
    assert_eq!(Value::from(None::<i64>), Value::Nil);
    assert_eq!(Value::from(Some("hi")), Value::from("hi"));
}

#[test]
fn display_forms() {
    assert_eq!(Value::from("plain").to_string(), "plain");
    assert_eq!(format!("{:?}", Value::from("quoted")), "\"quoted\"");
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Int(-3).to_string(), "-3");
}

#[test]
fn type_display() {
    assert_eq!(Type::Int.to_string(), "int");
    assert_eq!(Type::Fact.to_string(), "fact");
    assert!(Type::Number.accepts(&Type::Float));
}
