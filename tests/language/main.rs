//! Integration tests for Layer 1: Language
//!
//! Tests for the GRL lexer, parser, compile checks, and AST visitors.

mod compile;
mod lexer;
mod parser;
