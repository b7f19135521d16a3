//! Core values, fact capabilities, and error types for Gavel.
//!
//! This crate provides:
//! - [`Value`] - The runtime value type produced by rule expressions
//! - [`Fact`] - The capability interface host objects implement
//! - [`Type`] - Runtime type descriptors
//! - [`Error`] - Rich error types with context and host error identity

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod fact;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, HostError};
pub use fact::{Fact, FactRef, arg_int, arg_str, as_fact_ref, fact_ref};
pub use types::{Arity, Type};
pub use value::{NativeFn, Value};

/// Result type for Gavel operations.
pub type Result<T> = std::result::Result<T, Error>;
