//! Integration tests for the firing loop
//!
//! Tests salience, change detection, completion, and isolation between
//! rule set instances.

use std::cell::RefCell;
use std::rc::Rc;

use gavel_engine::{DataContext, Engine, EngineConfig, EngineState, RuleBuilder, RuleLibrary};
use gavel_foundation::{Error, ErrorKind, Fact, Result, Type, Value, fact_ref};

#[derive(Default)]
struct Order {
    total: i64,
    hits: i64,
    notes: Vec<String>,
}

impl Fact for Order {
    fn type_name(&self) -> &str {
        "Order"
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        match name {
            "Total" => Some(Value::Int(self.total)),
            "Hits" => Some(Value::Int(self.hits)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Option<Result<()>> {
        let slot = match name {
            "Total" => &mut self.total,
            "Hits" => &mut self.hits,
            _ => return None,
        };
        Some(
            value
                .as_int()
                .map(|n| *slot = n)
                .ok_or_else(|| Error::type_mismatch(Type::Int, value.value_type())),
        )
    }

    fn invoke_method(&mut self, name: &str, args: &[Value]) -> Option<Result<Value>> {
        match name {
            "Note" => Some(gavel_foundation::arg_str(args, 0).map(|s| {
                self.notes.push(s.to_string());
                Value::Nil
            })),
            _ => None,
        }
    }
}

struct Harness {
    library: RuleLibrary,
    order: Rc<RefCell<Order>>,
    context: DataContext,
}

impl Harness {
    fn new(source: &str, total: i64) -> Self {
        let library = RuleLibrary::new();
        RuleBuilder::new(&library)
            .build_from_source("Orders", "1", source)
            .unwrap();
        let order = fact_ref(Order {
            total,
            ..Order::default()
        });
        let mut context = DataContext::new();
        context.add_fact("O", &order).unwrap();
        Self {
            library,
            order,
            context,
        }
    }

    fn run(&mut self, engine: &mut Engine) -> Result<Vec<String>> {
        let mut instance = self.library.instantiate("Orders", "1").unwrap();
        engine
            .execute(&mut self.context, &mut instance)
            .map(|summary| summary.fired)
    }
}

#[test]
fn changed_sees_updates_from_other_rules() {
    let mut h = Harness::new(
        "
        rule Watch { when Changed(O.Total) then O.Hits += 1; }
        rule Bump salience -1 { when O.Total < 30 then O.Total += 10; }
        ",
        10,
    );
    let fired = h.run(&mut Engine::default()).unwrap();
    assert_eq!(fired, ["Watch", "Bump", "Watch", "Bump", "Watch"]);
    let order = h.order.borrow();
    assert_eq!(order.total, 30);
    assert_eq!(order.hits, 3);
}

#[test]
fn forget_makes_a_path_look_new() {
    let mut h = Harness::new(
        "rule Again { when Changed(O.Total) && O.Hits < 3 then O.Hits += 1; Forget(O.Total); }",
        0,
    );
    let fired = h.run(&mut Engine::default()).unwrap();
    assert_eq!(fired.len(), 3);
    assert_eq!(h.order.borrow().hits, 3);
}

#[test]
fn unchanged_paths_settle() {
    let mut h = Harness::new("rule Once { when Changed(O.Total) then O.Hits += 1; }", 5);
    let fired = h.run(&mut Engine::default()).unwrap();
    assert_eq!(fired, ["Once"]);
}

#[test]
fn complete_ends_run_with_pending_rules() {
    let mut h = Harness::new(
        r#"
        rule Stop salience 10 { when O.Total > 100 then O.Note("stopping"); Complete(); }
        rule Grow { when true then O.Total += 60; }
        "#,
        0,
    );
    let mut engine = Engine::default();
    let fired = h.run(&mut engine).unwrap();
    assert_eq!(fired, ["Grow", "Grow", "Stop"]);
    assert_eq!(h.order.borrow().notes, ["stopping"]);
    assert_eq!(engine.state(), EngineState::Completed);
}

#[test]
fn retract_is_idempotent_and_ignores_unknown_names() {
    let mut h = Harness::new(
        r#"rule R { when true then O.Hits += 1; Retract("R"); Retract("R"); Retract("Nobody"); }"#,
        0,
    );
    let fired = h.run(&mut Engine::default()).unwrap();
    assert_eq!(fired, ["R"]);
    assert_eq!(h.order.borrow().hits, 1);
}

#[test]
fn runaway_rules_hit_the_ceiling() {
    let mut h = Harness::new("rule Spin { when true then O.Hits += 1; }", 0);
    let mut engine = Engine::new(EngineConfig::strict());
    let err = h.run(&mut engine).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleLimitExceeded { limit: 100 }));
    assert_eq!(h.order.borrow().hits, 100);
    assert_eq!(engine.state(), EngineState::Aborted);
}

#[test]
fn action_errors_keep_earlier_writes() {
    let mut h = Harness::new(
        r#"rule Partial { when true then O.Hits = 7; O.Total = "bad"; O.Hits = 9; }"#,
        0,
    );
    let err = h.run(&mut Engine::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    assert_eq!(h.order.borrow().hits, 7);
}

#[test]
fn rule_locals_are_visible_to_later_statements() {
    let mut h = Harness::new(
        r#"rule Locals { when O.Hits == 0 then Base = O.Total * 2; O.Hits = Base + 1; }"#,
        4,
    );
    h.run(&mut Engine::default()).unwrap();
    assert_eq!(h.order.borrow().hits, 9);
    assert_eq!(h.context.variable("Base"), Some(&Value::Int(8)));
}

#[test]
fn instances_from_one_template_are_deterministic() {
    let source = "
        rule Low salience 1 { when O.Total < 3 then O.Total += 1; }
        rule High salience 2 { when O.Total < 2 then O.Total += 1; O.Hits += 1; }
    ";
    let mut first = Harness::new(source, 0);
    let mut second = Harness::new(source, 0);
    let a = first.run(&mut Engine::default()).unwrap();
    let b = second.run(&mut Engine::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, ["High", "High", "Low"]);
    assert_eq!(first.order.borrow().hits, 2);
}

mod ordering {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fires_by_salience_then_declaration(saliences in prop::collection::vec(-5i64..5, 1..8)) {
            let source: String = saliences
                .iter()
                .enumerate()
                .map(|(i, s)| format!("rule R{i} salience {s} {{ when true then Retract(\"R{i}\"); }}\n"))
                .collect();
            let mut h = Harness::new(&source, 0);
            let fired = h.run(&mut Engine::default()).unwrap();

            let mut expected: Vec<(usize, i64)> = saliences.iter().copied().enumerate().collect();
            expected.sort_by(|a, b| b.1.cmp(&a.1));
            let expected: Vec<String> = expected.iter().map(|(i, _)| format!("R{i}")).collect();
            prop_assert_eq!(fired, expected);
        }
    }
}
