//! Integration tests for Error types
//!
//! Tests error construction, display, context, and host error identity.

use std::error::Error as _;
use std::sync::Arc;

use gavel_foundation::{Arity, Error, ErrorContext, ErrorKind, HostError, Type};

#[derive(Debug, thiserror::Error)]
#[error("repository unavailable")]
struct RepoDown;

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_type_mismatch() {
    let err = Error::type_mismatch(Type::Int, Type::String);
    assert_eq!(err.to_string(), "type mismatch: expected int, got string");
}

#[test]
fn error_unknown_member() {
    let err = Error::unknown_member("MyFact", "Missing");
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownMember { ref target, ref member } if target == "MyFact" && member == "Missing"
    ));
    assert_eq!(err.to_string(), "no such member: Missing on MyFact");
}

#[test]
fn error_arity_mismatch() {
    let err = Error::arity_mismatch("Len", Arity::Exact(1), 3);
    let msg = err.to_string();
    assert!(msg.contains("Len"));
    assert!(msg.contains('3'));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_source_is_displayed() {
    let err = Error::unknown_identifier("Foo")
        .with_context(ErrorContext::new().with_source("rule CheckValues"));
    assert_eq!(
        err.to_string(),
        "unknown identifier: Foo (in rule CheckValues)"
    );
}

#[test]
fn frames_accumulate() {
    let err = Error::not_assignable("A")
        .in_frame("statement 1")
        .in_frame("rule R");
    let context = err.context.unwrap();
    assert_eq!(context.stack, ["statement 1", "rule R"]);
    assert!(context.source.is_none());
}

// =============================================================================
// Host Errors
// =============================================================================

#[test]
fn host_error_is_downcastable_and_chained() {
    let err = Error::host(RepoDown);
    assert!(err.is_host());
    assert!(err.downcast_host_ref::<RepoDown>().is_some());
    assert_eq!(err.to_string(), "repository unavailable");

    let source = err.source().unwrap();
    assert!(source.downcast_ref::<RepoDown>().is_some());
}

#[test]
fn host_error_identity_survives_clones() {
    let shared: Arc<dyn std::error::Error + Send + Sync> = Arc::new(RepoDown);
    let host = HostError::from_shared(Arc::clone(&shared));
    let err = Error::from(host.clone()).in_frame("rule R");

    let carried = err.host_error().unwrap();
    assert!(carried.ptr_eq(&host));
    assert!(Arc::ptr_eq(carried.shared(), &shared));
    assert!(!carried.ptr_eq(&HostError::new(RepoDown)));
}

#[test]
fn non_host_errors_have_no_source() {
    let err = Error::new(ErrorKind::DivisionByZero);
    assert!(!err.is_host());
    assert!(err.source().is_none());
    assert!(err.downcast_host_ref::<RepoDown>().is_none());
}
