//! Cycle-based rule execution engine for Gavel.
//!
//! This crate provides:
//! - [`DataContext`] - Facts and rule-local variables addressed by rule text
//! - [`WorkingMemory`] - Change detection between cycles
//! - [`RuleLibrary`], [`RuleBuilder`], [`RuleSetInstance`] - Compiled rule sets
//! - [`Evaluator`] - Expression and statement evaluation
//! - [`Engine`] - The firing loop with salience, retraction, and a cycle ceiling
//!
//! # Example
//!
//! ```
//! use gavel_engine::{DataContext, Engine, EngineConfig, RuleBuilder, RuleLibrary};
//!
//! let library = RuleLibrary::new();
//! RuleBuilder::new(&library)
//!     .build_from_source("Demo", "1", r#"rule Done { when true then Retract("Done"); }"#)
//!     .unwrap();
//!
//! let mut instance = library.instantiate("Demo", "1").unwrap();
//! let mut context = DataContext::new();
//! let summary = Engine::new(EngineConfig::default())
//!     .execute(&mut context, &mut instance)
//!     .unwrap();
//! assert_eq!(summary.fired, ["Done"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod config;
pub mod context;
pub mod engine;
pub mod eval;
pub mod knowledge;
pub mod library;
pub mod listener;
pub mod memory;
pub mod ops;
pub mod resource;
pub mod trace;

pub use builder::RuleBuilder;
pub use config::{DEFAULT_MAX_CYCLES, EngineConfig};
pub use context::DataContext;
pub use engine::{Engine, EngineState, ExecutionSummary, RuleMatch};
pub use eval::Evaluator;
pub use knowledge::{RuleInstance, RuleSetInstance, RuleSetTemplate};
pub use library::{RuleLibrary, RuleSetKey};
pub use listener::ExecutionListener;
pub use memory::WorkingMemory;
pub use resource::{BytesResource, FileResource, Resource};
pub use trace::{TraceEvent, TraceRecord, TraceRecorder};
