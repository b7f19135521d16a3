//! Host facts whose methods fail, and the error that reaches the caller.

use std::cell::RefCell;
use std::error::Error as _;
use std::rc::Rc;
use std::sync::Arc;

use gavel_engine::{DataContext, Engine, EngineState, RuleBuilder, RuleLibrary};
use gavel_foundation::{
    Error, ErrorKind, Fact, HostError, Result, Type, Value, arg_str, fact_ref,
};

const RULES: &str = r#"
rule CheckValues "Check the default values" salience 10 {
    when
        MF.IntAttribute == 123 && MF.StringAttribute == "Some string value"
    then
        Sentence = R.GetSentence();
        MF.WhatToSay = MF.GetWhatToSay(Sentence);
        Retract("CheckValues");
}
"#;

#[derive(Debug, thiserror::Error)]
#[error("this is a defined error")]
struct Defined;

struct MyFact {
    int_attribute: i64,
    string_attribute: String,
    what_to_say: String,
}

impl Default for MyFact {
    fn default() -> Self {
        Self {
            int_attribute: 123,
            string_attribute: "Some string value".to_string(),
            what_to_say: String::new(),
        }
    }
}

impl Fact for MyFact {
    fn type_name(&self) -> &str {
        "MyFact"
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        match name {
            "IntAttribute" => Some(Value::Int(self.int_attribute)),
            "StringAttribute" => Some(Value::from(self.string_attribute.as_str())),
            "WhatToSay" => Some(Value::from(self.what_to_say.as_str())),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Option<Result<()>> {
        (name == "WhatToSay").then(|| match value {
            Value::String(s) => {
                self.what_to_say = s.to_string();
                Ok(())
            }
            other => Err(Error::type_mismatch(Type::String, other.value_type())),
        })
    }

    fn invoke_method(&mut self, name: &str, args: &[Value]) -> Option<Result<Value>> {
        (name == "GetWhatToSay")
            .then(|| arg_str(args, 0).map(|s| Value::from(format!("Let say \"{s}\""))))
    }
}

/// Returns a sentence, or a shared host error when one is configured.
struct Repo {
    failure: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Fact for Repo {
    fn type_name(&self) -> &str {
        "Repo"
    }

    fn get_attribute(&self, _name: &str) -> Option<Value> {
        None
    }

    fn invoke_method(&mut self, name: &str, _args: &[Value]) -> Option<Result<Value>> {
        (name == "GetSentence").then(|| match &self.failure {
            Some(error) => Err(HostError::from_shared(Arc::clone(error)).into()),
            None => Ok(Value::from("Hello from the repo")),
        })
    }
}

fn run(repo: Repo) -> (Rc<RefCell<MyFact>>, Engine, Result<()>) {
    let library = RuleLibrary::new();
    RuleBuilder::new(&library)
        .build_from_source("Test", "0.1.1", RULES)
        .unwrap();

    let my_fact = fact_ref(MyFact::default());
    let mut context = DataContext::new();
    context.add_fact("MF", &my_fact).unwrap();
    context.add_fact("R", &fact_ref(repo)).unwrap();

    let mut instance = library.instantiate("Test", "0.1.1").unwrap();
    let mut engine = Engine::default();
    let result = engine.execute(&mut context, &mut instance).map(drop);
    (my_fact, engine, result)
}

#[test]
fn repository_sentence_is_said() {
    let (my_fact, engine, result) = run(Repo { failure: None });
    result.unwrap();
    assert_eq!(my_fact.borrow().what_to_say, "Let say \"Hello from the repo\"");
    assert_eq!(engine.state(), EngineState::Completed);
}

#[test]
fn host_error_aborts_with_identity_preserved() {
    let defined: Arc<dyn std::error::Error + Send + Sync> = Arc::new(Defined);
    let (my_fact, engine, result) = run(Repo {
        failure: Some(Arc::clone(&defined)),
    });

    let err = result.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Host(_)));
    assert!(Arc::ptr_eq(err.host_error().unwrap().shared(), &defined));
    assert!(err.downcast_host_ref::<Defined>().is_some());
    assert!(err.source().unwrap().downcast_ref::<Defined>().is_some());
    assert_eq!(err.to_string(), "this is a defined error (in rule CheckValues)");

    assert_eq!(my_fact.borrow().what_to_say, "");
    assert_eq!(engine.state(), EngineState::Aborted);
}
