//! Fact context: the names rule text can address.
//!
//! A [`DataContext`] binds identifiers to host facts and holds the rule-local
//! variables created by assignments such as `Sentence = R.GetSentence();`.
//! Facts are shared handles; the host keeps its own handle and reads results
//! from it after execution.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gavel_foundation::{Error, ErrorKind, Fact, FactRef, Result, Value};
use gavel_language::VariablePath;

use crate::eval::read_member;

/// Identifier bindings for one logical run.
#[derive(Debug, Default)]
pub struct DataContext {
    facts: HashMap<String, FactRef>,
    variables: HashMap<String, Value>,
}

impl DataContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a fact under `name`.
    ///
    /// # Errors
    /// Returns `DuplicateFact` if the name is already bound.
    pub fn add(&mut self, name: impl Into<String>, fact: FactRef) -> Result<()> {
        let name = name.into();
        if self.facts.contains_key(&name) {
            return Err(Error::new(ErrorKind::DuplicateFact(name)));
        }
        self.facts.insert(name, fact);
        Ok(())
    }

    /// Binds a concretely typed fact handle under `name`.
    ///
    /// # Errors
    /// Returns `DuplicateFact` if the name is already bound.
    pub fn add_fact<F: Fact + 'static>(
        &mut self,
        name: impl Into<String>,
        fact: &Rc<RefCell<F>>,
    ) -> Result<()> {
        self.add(name, fact.clone())
    }

    /// Returns the fact bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FactRef> {
        self.facts.get(name).cloned()
    }

    /// Returns true if a fact is bound to `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Unbinds a fact, returning it.
    pub fn remove(&mut self, name: &str) -> Option<FactRef> {
        self.facts.remove(name)
    }

    /// Bound fact names, sorted.
    #[must_use]
    pub fn fact_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.facts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the value of a rule-local variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Sets a rule-local variable.
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Drops every rule-local variable.
    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    /// Resolves a root identifier: facts first, then variables.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Value> {
        self.facts
            .get(name)
            .map(|fact| Value::Fact(fact.clone()))
            .or_else(|| self.variables.get(name).cloned())
    }

    /// Reads a dotted path such as `MF.WhatToSay` for host introspection.
    ///
    /// Walks the path the same way rule text does, without recording
    /// anything in working memory.
    ///
    /// # Errors
    /// Returns `UnknownIdentifier` for an unbound root or a malformed path,
    /// `UnknownMember` for a missing member, or a host error raised by a
    /// zero-argument method on the way.
    pub fn get_variable_value(&self, path: &str) -> Result<Value> {
        let parsed =
            VariablePath::parse_dotted(path).ok_or_else(|| Error::unknown_identifier(path))?;
        let mut value = self
            .resolve(&parsed.root)
            .ok_or_else(|| Error::unknown_identifier(&parsed.root))?;
        for accessor in &parsed.accessors {
            value = read_member(&value, accessor)?;
        }
        Ok(value)
    }
}
