//! Integration tests for Layers 2-3: Standard library and engine
//!
//! Tests for working memory, the rule library, built-in functions, and the
//! firing loop.

mod execution;
mod library;
mod memory;
