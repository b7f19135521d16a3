//! Gavel - Business rule engine
//!
//! This crate re-exports all layers of the Gavel system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: gavel_engine      - Working memory, rule library, firing loop
//! Layer 2: gavel_stdlib      - Built-in functions callable from rule text
//! Layer 1: gavel_language    - GRL lexer, parser, AST
//! Layer 0: gavel_foundation  - Core types (Value, Fact, Error)
//! ```

pub use gavel_engine as engine;
pub use gavel_foundation as foundation;
pub use gavel_language as language;
pub use gavel_stdlib as stdlib;

pub use gavel_engine::{
    BytesResource, DataContext, Engine, EngineConfig, EngineState, ExecutionSummary,
    FileResource, Resource, RuleBuilder, RuleLibrary, RuleSetInstance,
};
pub use gavel_foundation::{Error, ErrorKind, Fact, FactRef, Result, Value, fact_ref};
