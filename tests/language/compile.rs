//! Integration tests for compile-time checks and AST visitors

use gavel_foundation::ErrorKind;
use gavel_language::visitor::{ExpressionVisitor, referenced_paths, walk_rule};
use gavel_language::{Expression, Span, compile, parse_expression};

#[test]
fn compile_accepts_engine_builtins() {
    let rules = compile(
        r#"rule Watch { when Changed(Order.Total) && Order.Total > 10 then Forget(Order.Total); Retract("Watch"); }"#,
    )
    .unwrap();
    assert_eq!(rules.len(), 1);
}

#[test]
fn compile_rejects_forget_without_path() {
    let err = compile(r#"rule A { when true then Forget("Order.Total"); }"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { .. }));
    assert!(err.to_string().contains("Forget expects a single variable path"));
}

#[test]
fn compile_names_the_offending_rule() {
    let err = compile(
        r#"
        rule Good { when true then Retract("Good"); }
        rule Bad { when true then Retract("a", "b"); }
        "#,
    )
    .unwrap_err();
    assert_eq!(err.context.unwrap().stack, ["rule Bad"]);
}

#[test]
fn referenced_paths_are_distinct_and_ordered() {
    let expr = parse_expression("A.X > 1 && B.Y == A.X").unwrap();
    assert_eq!(referenced_paths(&expr), ["A.X", "B.Y"]);
}

#[derive(Default)]
struct CallCounter {
    builtins: Vec<String>,
    methods: Vec<String>,
}

impl ExpressionVisitor for CallCounter {
    fn visit_method_call(&mut self, method: &str, _args: &[Expression], _span: Span) {
        self.methods.push(method.to_string());
    }

    fn visit_builtin_call(&mut self, name: &str, _args: &[Expression], _span: Span) {
        self.builtins.push(name.to_string());
    }
}

#[test]
fn visitor_walks_condition_and_actions() {
    let rules = compile(
        r#"rule R { when Len(S.Name) > 0 then S.Say(ToUpper(S.Name)); Complete(); }"#,
    )
    .unwrap();
    let mut counter = CallCounter::default();
    walk_rule(&mut counter, &rules[0]);
    assert_eq!(counter.builtins, ["Len", "ToUpper", "Complete"]);
    assert_eq!(counter.methods, ["Say"]);
}
