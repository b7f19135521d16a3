//! The root crate re-exports enough to drive the engine on its own.

use gavel::{DataContext, Engine, EngineConfig, RuleBuilder, RuleLibrary};

#[test]
fn facade_runs_rules() {
    let library = RuleLibrary::new();
    RuleBuilder::new(&library)
        .build_from_source("Facade", "1", r#"rule Done { when true then Count = 1; Complete(); }"#)
        .unwrap();
    let mut instance = library.instantiate("Facade", "1").unwrap();
    let mut context = DataContext::new();
    let mut engine = Engine::new(EngineConfig::traced());
    let summary = engine.execute(&mut context, &mut instance).unwrap();
    assert_eq!(summary.fired, ["Done"]);
    assert_eq!(context.variable("Count"), Some(&gavel::Value::Int(1)));

    let trace = engine.trace().unwrap().render();
    assert!(trace.contains("fire Done"));
    assert_eq!(gavel::engine::DEFAULT_MAX_CYCLES, 5000);
}
