//! Built-in functions callable from Gavel rule text.
//!
//! Functions are organized by category:
//! - [`string`] - length, case, trimming, searching
//! - [`math`] - absolute value, rounding, min/max, powers
//! - [`predicate`] - nil and type checks
//!
//! Engine built-ins that touch rule state (`Retract`, `Changed`, `Forget`,
//! `Complete`) are not here; the evaluator handles them before consulting the
//! [`FunctionRegistry`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod math;
pub mod predicate;
pub mod string;

use std::collections::HashMap;

use gavel_foundation::{Arity, Error, ErrorKind, NativeFn, Result, Value};

/// Lookup table from function name to native implementation.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<&'static str, NativeFn>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every standard function.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        string::register(&mut registry);
        math::register(&mut registry);
        predicate::register(&mut registry);
        registry
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register(&mut self, function: NativeFn) {
        self.functions.insert(function.name, function);
    }

    /// Convenience for registering a function from its parts.
    pub fn define(
        &mut self,
        name: &'static str,
        arity: Arity,
        func: fn(&[Value]) -> Result<Value>,
    ) {
        self.register(NativeFn { name, arity, func });
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NativeFn> {
        self.functions.get(name)
    }

    /// Returns true if a function with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no functions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Calls a function after checking its arity.
    ///
    /// # Errors
    /// Returns `UnknownFunction` for an unregistered name, `ArityMismatch` for
    /// a wrong argument count, or whatever the function itself reports.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let function = self
            .get(name)
            .ok_or_else(|| Error::new(ErrorKind::UnknownFunction(name.to_string())))?;
        if !function.arity.accepts(args.len()) {
            return Err(Error::arity_mismatch(name, function.arity, args.len()));
        }
        (function.func)(args)
    }
}
