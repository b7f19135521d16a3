//! A rule fires only for the fact values its condition names.

use gavel_engine::{DataContext, Engine, RuleBuilder, RuleLibrary};
use gavel_foundation::{Error, Fact, Result, Type, Value, fact_ref};
use proptest::prelude::*;

struct Reading {
    value: i64,
}

impl Fact for Reading {
    fn type_name(&self) -> &str {
        "Reading"
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        (name == "Value").then_some(Value::Int(self.value))
    }
}

fn fired_for(value: i64) -> Vec<String> {
    let library = RuleLibrary::new();
    RuleBuilder::new(&library)
        .build_from_source(
            "Select",
            "1",
            r#"rule Exact { when R.Value == 123 then Retract("Exact"); }"#,
        )
        .unwrap();
    let mut context = DataContext::new();
    context.add_fact("R", &fact_ref(Reading { value })).unwrap();
    let mut instance = library.instantiate("Select", "1").unwrap();
    Engine::default()
        .execute(&mut context, &mut instance)
        .unwrap()
        .fired
}

#[test]
fn fires_only_on_match() {
    assert_eq!(fired_for(123), ["Exact"]);
    assert!(fired_for(1234).is_empty());
}

/// A reading with one output slot per rule.
struct Marked {
    value: i64,
    exact: String,
    longer: String,
}

impl Fact for Marked {
    fn type_name(&self) -> &str {
        "Marked"
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        match name {
            "Value" => Some(Value::Int(self.value)),
            "Exact" => Some(self.exact.as_str().into()),
            "Longer" => Some(self.longer.as_str().into()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Option<Result<()>> {
        let slot = match name {
            "Exact" => &mut self.exact,
            "Longer" => &mut self.longer,
            _ => return None,
        };
        Some(
            value
                .as_str()
                .map(|s| *slot = s.to_string())
                .ok_or_else(|| Error::type_mismatch(Type::String, value.value_type())),
        )
    }
}

#[test]
fn neighbouring_rule_leaves_its_field_alone() {
    let library = RuleLibrary::new();
    RuleBuilder::new(&library)
        .build_from_source(
            "Select",
            "2",
            r#"
            rule R123 { when M.Value == 123 then M.Exact = "hit"; Retract("R123"); }
            rule R1234 { when M.Value == 1234 then M.Longer = "hit"; Retract("R1234"); }
            "#,
        )
        .unwrap();
    let marked = fact_ref(Marked {
        value: 123,
        exact: String::new(),
        longer: String::new(),
    });
    let mut context = DataContext::new();
    context.add_fact("M", &marked).unwrap();
    let mut instance = library.instantiate("Select", "2").unwrap();
    let summary = Engine::default().execute(&mut context, &mut instance).unwrap();

    assert_eq!(summary.fired, ["R123"]);
    assert_eq!(marked.borrow().exact, "hit");
    assert_eq!(marked.borrow().longer, "");
}

proptest! {
    #[test]
    fn other_values_never_fire(value in any::<i64>().prop_filter("not 123", |v| *v != 123)) {
        prop_assert!(fired_for(value).is_empty());
    }
}
