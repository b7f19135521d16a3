//! Integration tests for the Fact capability interface
//!
//! Tests default hooks, argument helpers, and handle identity.

use gavel_foundation::{
    Error, Fact, FactRef, Result, Type, Value, arg_int, arg_str, as_fact_ref, fact_ref,
};

struct Greeter {
    greeting: String,
}

impl Fact for Greeter {
    fn type_name(&self) -> &str {
        "Greeter"
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        (name == "Greeting").then(|| Value::from(self.greeting.as_str()))
    }

    fn invoke_method(&mut self, name: &str, args: &[Value]) -> Option<Result<Value>> {
        match name {
            "Greet" => Some(arg_str(args, 0).map(|who| Value::from(format!("{} {who}", self.greeting)))),
            "Repeat" => Some(arg_int(args, 0).map(|n| {
                let n = usize::try_from(n).unwrap_or(0);
                Value::from(self.greeting.repeat(n))
            })),
            _ => None,
        }
    }
}

fn greeter() -> FactRef {
    as_fact_ref(&fact_ref(Greeter {
        greeting: "hi".to_string(),
    }))
}

#[test]
fn default_hooks_report_missing_members() {
    let fact = greeter();
    let mut fact = fact.borrow_mut();
    assert!(fact.set_attribute("Greeting", Value::from("yo")).is_none());
    assert!(fact.invoke_method("Unknown", &[]).is_none());
    assert_eq!(fact.get_attribute("Greeting"), Some(Value::from("hi")));
}

#[test]
fn argument_helpers() {
    let fact = greeter();
    let mut fact = fact.borrow_mut();
    let greeted = fact.invoke_method("Greet", &[Value::from("bob")]).unwrap();
    assert_eq!(greeted.unwrap(), Value::from("hi bob"));
    assert_eq!(
        fact.invoke_method("Repeat", &[Value::Int(2)]).unwrap().unwrap(),
        Value::from("hihi")
    );

    let err = fact.invoke_method("Greet", &[Value::Int(1)]).unwrap().unwrap_err();
    assert_eq!(err.to_string(), Error::type_mismatch(Type::String, Type::Int).to_string());
    let err = fact.invoke_method("Repeat", &[]).unwrap().unwrap_err();
    assert_eq!(err.to_string(), "type mismatch: expected int, got nil");
}

#[test]
fn fact_values_compare_by_identity() {
    let handle = fact_ref(Greeter {
        greeting: "hi".to_string(),
    });
    let a = Value::Fact(as_fact_ref(&handle));
    let b = Value::Fact(as_fact_ref(&handle));
    assert_eq!(a, b);
    assert_ne!(a, Value::Fact(greeter()));
    assert_eq!(a.value_type(), Type::Fact);
    assert_eq!(format!("{a:?}"), "<fact Greeter>");
}
