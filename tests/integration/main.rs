//! Cross-layer integration tests for Gavel
//!
//! Tests that drive rule text through the builder, library, and engine
//! against host facts.

mod facade;
mod host_errors;
mod selective_firing;
