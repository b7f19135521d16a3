//! Integration tests for the GRL parser

use gavel_foundation::ErrorKind;
use gavel_language::{Expression, Statement, parse, parse_expression};

const CHECK_VALUES: &str = r#"
rule CheckValues "Check the default values" salience 10 {
    when
        MF.IntAttribute == 123 && MF.StringAttribute == "Some string value"
    then
        MF.WhatToSay = MF.GetWhatToSay("hello");
        Retract("CheckValues");
}
"#;

#[test]
fn parses_full_rule() {
    let rules = parse(CHECK_VALUES).unwrap();
    assert_eq!(rules.len(), 1);
    let rule = &rules[0];
    assert_eq!(rule.name, "CheckValues");
    assert_eq!(rule.salience, 10);
    assert_eq!(
        rule.condition.to_string(),
        r#"(MF.IntAttribute == 123) && (MF.StringAttribute == "Some string value")"#
    );
    assert!(matches!(
        &rule.actions[0],
        Statement::Assignment { target, .. } if target.fingerprint() == "MF.WhatToSay"
    ));
    assert!(matches!(
        &rule.actions[1],
        Statement::Expression(Expression::BuiltinCall { name, .. }) if name == "Retract"
    ));
}

#[test]
fn parses_multiple_rules_in_order() {
    let rules = parse(
        "rule A { when true then X = 1; }
         rule B salience -2 { when false then X = 2; }",
    )
    .unwrap();
    let names: Vec<_> = rules.iter().map(|r| (r.name.as_str(), r.salience)).collect();
    assert_eq!(names, [("A", 0), ("B", -2)]);
}

#[test]
fn expression_precedence() {
    let expr = parse_expression("1 + 2 * 3 == 7 || !A.B").unwrap();
    assert_eq!(expr.to_string(), "((1 + (2 * 3)) == 7) || !A.B");
}

#[test]
fn rejects_missing_then() {
    let err = parse("rule A { when true X = 1; }").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { line: 1, .. }));
}

#[test]
fn rejects_empty_action_list() {
    assert!(parse("rule A { when true then }").is_err());
}

#[test]
fn parse_error_reports_position() {
    let err = parse("rule A {\n  when )\n}").unwrap_err();
    let ErrorKind::ParseError { line, context, .. } = err.kind else {
        panic!("expected parse error");
    };
    assert_eq!(line, 2);
    assert_eq!(context, "  when )");
}
