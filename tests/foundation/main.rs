//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Type, Fact, and Error.

mod errors;
mod facts;
mod values;
