//! Rule sets: immutable templates and per-execution instances.
//!
//! A [`RuleSetTemplate`] is compiled once and shared. Each execution works on
//! a [`RuleSetInstance`], which shares the template's rule definitions but
//! owns its retraction flags and working memory.

use std::collections::HashMap;
use std::sync::Arc;

use gavel_foundation::{Error, ErrorKind, Result};
use gavel_language::RuleDefinition;

use crate::memory::WorkingMemory;

// =============================================================================
// Template
// =============================================================================

/// Compiled rules in declaration order, with lookup by name.
#[derive(Clone, Debug, Default)]
pub struct RuleSetTemplate {
    rules: Vec<Arc<RuleDefinition>>,
    index: HashMap<String, usize>,
}

impl RuleSetTemplate {
    /// Creates a template from compiled rules.
    ///
    /// # Errors
    /// Returns `DuplicateRule` if two rules share a name.
    pub fn new(rules: Vec<RuleDefinition>) -> Result<Self> {
        let mut template = Self::default();
        template.extend(rules)?;
        Ok(template)
    }

    /// Appends rules after the existing ones.
    ///
    /// On error the template is left as it was.
    pub(crate) fn extend(&mut self, rules: Vec<RuleDefinition>) -> Result<()> {
        let mut added = HashMap::with_capacity(rules.len());
        for (offset, rule) in rules.iter().enumerate() {
            if self.index.contains_key(&rule.name)
                || added.insert(rule.name.clone(), self.rules.len() + offset).is_some()
            {
                return Err(Error::new(ErrorKind::DuplicateRule(rule.name.clone())));
            }
        }
        self.index.extend(added);
        self.rules.extend(rules.into_iter().map(Arc::new));
        Ok(())
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Arc<RuleDefinition>] {
        &self.rules
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Arc<RuleDefinition>> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    /// Declaration index of a rule.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the template has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Instance
// =============================================================================

/// A rule inside one execution.
#[derive(Clone, Debug)]
pub struct RuleInstance {
    definition: Arc<RuleDefinition>,
    retracted: bool,
}

impl RuleInstance {
    /// The shared compiled rule.
    #[must_use]
    pub fn definition(&self) -> &Arc<RuleDefinition> {
        &self.definition
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Rule salience.
    #[must_use]
    pub fn salience(&self) -> i64 {
        self.definition.salience
    }

    /// Returns true once the rule has been retracted.
    #[must_use]
    pub fn is_retracted(&self) -> bool {
        self.retracted
    }
}

/// An independent, executable copy of a rule set.
///
/// Not `Send`: working memory holds fact handles.
#[derive(Clone, Debug)]
pub struct RuleSetInstance {
    name: String,
    version: String,
    template: Arc<RuleSetTemplate>,
    rules: Vec<RuleInstance>,
    memory: WorkingMemory,
}

impl RuleSetInstance {
    /// Creates a fresh instance of a template: nothing retracted, empty memory.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        template: Arc<RuleSetTemplate>,
    ) -> Self {
        let rules = template
            .rules()
            .iter()
            .map(|definition| RuleInstance {
                definition: Arc::clone(definition),
                retracted: false,
            })
            .collect();
        Self {
            name: name.into(),
            version: version.into(),
            template,
            rules,
            memory: WorkingMemory::new(),
        }
    }

    /// Rule set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule set version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[RuleInstance] {
        &self.rules
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&RuleInstance> {
        self.template.position(name).map(|i| &self.rules[i])
    }

    /// Retracts a rule so it is skipped for the rest of this instance's life.
    ///
    /// Returns false if no rule has that name. Retracting twice is harmless.
    pub fn retract(&mut self, name: &str) -> bool {
        match self.template.position(name) {
            Some(i) => {
                self.rules[i].retracted = true;
                true
            }
            None => false,
        }
    }

    /// Returns true if the named rule is retracted.
    #[must_use]
    pub fn is_retracted(&self, name: &str) -> bool {
        self.rule(name).is_some_and(RuleInstance::is_retracted)
    }

    /// Non-retracted rules with their declaration index.
    #[must_use]
    pub fn active_rules(&self) -> Vec<(usize, Arc<RuleDefinition>)> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| !rule.retracted)
            .map(|(i, rule)| (i, Arc::clone(&rule.definition)))
            .collect()
    }

    /// Clears every retraction flag and the working memory.
    pub fn reset(&mut self) {
        for rule in &mut self.rules {
            rule.retracted = false;
        }
        self.memory.reset();
    }

    /// This instance's working memory.
    #[must_use]
    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    /// Mutable access to the working memory.
    pub fn memory_mut(&mut self) -> &mut WorkingMemory {
        &mut self.memory
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the instance has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
