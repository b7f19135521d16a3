//! Integration tests for the rule library and builder

use std::sync::Arc;
use std::thread;

use gavel_engine::{BytesResource, FileResource, RuleBuilder, RuleLibrary, RuleSetKey, RuleSetTemplate};
use gavel_foundation::ErrorKind;
use gavel_language::compile;

#[test]
fn builds_accumulate_under_one_key() {
    let library = RuleLibrary::new();
    let builder = RuleBuilder::new(&library);
    builder
        .build_from_source("Pricing", "1.0.0", "rule A { when true then Complete(); }")
        .unwrap();
    let template = builder
        .build_from_source("Pricing", "1.0.0", "rule B { when true then Complete(); }")
        .unwrap();

    let names: Vec<_> = template.rules().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    assert_eq!(library.len(), 1);
    assert_eq!(template.position("B"), Some(1));
}

#[test]
fn versions_are_separate_rule_sets() {
    let library = RuleLibrary::new();
    let builder = RuleBuilder::new(&library);
    builder
        .build_from_source("Pricing", "2.0.0", "rule A { when true then Complete(); }")
        .unwrap();
    builder
        .build_from_source("Pricing", "1.0.0", "rule A { when true then Complete(); }")
        .unwrap();
    assert_eq!(
        library.keys(),
        [
            RuleSetKey::new("Pricing", "1.0.0"),
            RuleSetKey::new("Pricing", "2.0.0"),
        ]
    );
    assert_eq!(library.keys()[0].to_string(), "Pricing@1.0.0");
}

#[test]
fn duplicate_rule_leaves_library_untouched() {
    let library = RuleLibrary::new();
    let builder = RuleBuilder::new(&library);
    builder
        .build_from_source("Set", "1", "rule A { when true then Complete(); }")
        .unwrap();

    let err = builder
        .build_from_source(
            "Set",
            "1",
            "rule B { when true then Complete(); } rule A { when false then Complete(); }",
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateRule(ref n) if n == "A"));

    let template = library.template("Set", "1").unwrap();
    assert_eq!(template.len(), 1);
    assert!(template.rule("B").is_none());
}

#[test]
fn parse_failure_registers_nothing() {
    let library = RuleLibrary::new();
    let err = RuleBuilder::new(&library)
        .build_from_source("Set", "1", "rule A { when then }")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { .. }));
    assert!(library.is_empty());
}

#[test]
fn unknown_rule_set() {
    let library = RuleLibrary::new();
    let err = library.instantiate("Missing", "0").unwrap_err();
    assert_eq!(err.to_string(), "rule set not found: Missing version 0");
}

#[test]
fn register_replaces_and_returns_previous() {
    let library = RuleLibrary::new();
    let first = RuleSetTemplate::new(compile("rule A { when true then Complete(); }").unwrap()).unwrap();
    let second = RuleSetTemplate::new(compile("rule B { when true then Complete(); }").unwrap()).unwrap();
    assert!(library.register("Set", "1", first).is_none());
    let previous = library.register("Set", "1", second).unwrap();
    assert!(previous.rule("A").is_some());
    assert!(library.template("Set", "1").unwrap().rule("B").is_some());
    assert!(library.remove("Set", "1").is_some());
    assert!(!library.contains("Set", "1"));
}

#[test]
fn instances_do_not_share_retraction() {
    let library = RuleLibrary::new();
    RuleBuilder::new(&library)
        .build_from_source("Set", "1", "rule A { when true then Complete(); }")
        .unwrap();
    let mut first = library.instantiate("Set", "1").unwrap();
    let second = library.instantiate("Set", "1").unwrap();
    assert!(first.retract("A"));
    assert!(first.is_retracted("A"));
    assert!(!second.is_retracted("A"));
}

#[test]
fn concurrent_builds_keep_every_rule() {
    let library = Arc::new(RuleLibrary::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let library = Arc::clone(&library);
            thread::spawn(move || {
                let source = format!("rule R{i} {{ when true then Complete(); }}");
                RuleBuilder::new(&library)
                    .build_from_source("Shared", "1", &source)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(library.template("Shared", "1").unwrap().len(), 8);
}

#[test]
fn builds_from_resources() {
    let library = RuleLibrary::new();
    let builder = RuleBuilder::new(&library);
    builder
        .build_from_resource("Set", "1", &BytesResource::from("rule A { when true then Complete(); }"))
        .unwrap();
    assert!(library.contains("Set", "1"));

    let err = builder
        .build_from_resource("Set", "1", &BytesResource::new(vec![0xff, 0xfe]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Resource(_)));

    let err = builder
        .build_from_resource("Set", "1", &FileResource::new("/nonexistent/gavel/rules.grl"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Resource(_)));
    assert_eq!(library.template("Set", "1").unwrap().len(), 1);
}
