//! Integration tests for WorkingMemory change detection

use gavel_engine::WorkingMemory;
use gavel_foundation::Value;

#[test]
fn unseen_paths_count_as_changed() {
    let mut memory = WorkingMemory::new();
    assert!(memory.has_changed("A.X"));
    memory.update("A.X", Value::Int(1));
    assert!(memory.has_changed("A.X"));
    memory.begin_cycle();
    assert!(!memory.has_changed("A.X"));
    assert!(memory.is_stable());
}

#[test]
fn new_values_are_changes() {
    let mut memory = WorkingMemory::new();
    memory.update("A.X", Value::Int(1));
    memory.update("A.Y", Value::from("a"));
    memory.begin_cycle();

    memory.update("A.X", Value::Int(2));
    memory.update("A.Y", Value::from("a"));
    assert_eq!(memory.changed_paths(), ["A.X"]);
    assert!(!memory.is_stable());
}

#[test]
fn forget_drops_nested_paths_only() {
    let mut memory = WorkingMemory::new();
    memory.update("A", Value::Nil);
    memory.update("A.B", Value::Int(1));
    memory.update("A.B.C", Value::Int(2));
    memory.update("A.BC", Value::Int(3));
    memory.begin_cycle();

    memory.forget("A.B");
    assert!(memory.current("A.B").is_none());
    assert!(memory.current("A.B.C").is_none());
    assert!(memory.snapshot("A.B.C").is_none());
    assert_eq!(memory.current("A.BC"), Some(&Value::Int(3)));
    assert_eq!(memory.len(), 2);
    assert!(memory.has_changed("A.B"));
}

#[test]
fn reset_clears_everything() {
    let mut memory = WorkingMemory::new();
    memory.update("A.X", Value::Int(1));
    memory.begin_cycle();
    memory.reset();
    assert!(memory.is_empty());
    assert!(memory.snapshot("A.X").is_none());
}
