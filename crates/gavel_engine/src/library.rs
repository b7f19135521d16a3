//! Process-wide registry of rule set templates.
//!
//! Templates are keyed by (name, version); several versions of one rule set
//! can coexist. The library is `Send + Sync` and is usually shared behind an
//! `Arc`. Instantiating only clones `Arc` handles.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use gavel_foundation::{Error, ErrorKind, Result};
use gavel_language::RuleDefinition;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::knowledge::{RuleSetInstance, RuleSetTemplate};

/// Library key: rule set name plus version.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleSetKey {
    /// Rule set name.
    pub name: String,
    /// Rule set version.
    pub version: String,
}

impl RuleSetKey {
    /// Creates a key.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for RuleSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Thread-safe store of compiled rule sets.
#[derive(Debug, Default)]
pub struct RuleLibrary {
    templates: RwLock<HashMap<RuleSetKey, Arc<RuleSetTemplate>>>,
}

impl RuleLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, replacing any template under the same key.
    ///
    /// Returns the replaced template.
    pub fn register(
        &self,
        name: impl Into<String>,
        version: impl Into<String>,
        template: RuleSetTemplate,
    ) -> Option<Arc<RuleSetTemplate>> {
        let key = RuleSetKey::new(name, version);
        let rules = template.len();
        let previous = self.templates.write().insert(key.clone(), Arc::new(template));
        if previous.is_some() {
            warn!(rule_set = %key, "replaced registered rule set");
        }
        info!(rule_set = %key, rules, "registered rule set");
        previous
    }

    /// Appends rules to the template under a key, creating it if absent.
    ///
    /// The merge happens under the write lock, so concurrent builds for the
    /// same key never lose rules.
    ///
    /// # Errors
    /// Returns `DuplicateRule` if a rule name is already present; the library
    /// is unchanged in that case.
    pub fn merge(
        &self,
        name: impl Into<String>,
        version: impl Into<String>,
        rules: Vec<RuleDefinition>,
    ) -> Result<Arc<RuleSetTemplate>> {
        let key = RuleSetKey::new(name, version);
        let added = rules.len();
        let mut templates = self.templates.write();
        let mut template = templates
            .get(&key)
            .map(|existing| RuleSetTemplate::clone(existing))
            .unwrap_or_default();
        template.extend(rules)?;
        let template = Arc::new(template);
        templates.insert(key.clone(), Arc::clone(&template));
        drop(templates);
        info!(rule_set = %key, added, total = template.len(), "merged rules into rule set");
        Ok(template)
    }

    /// Creates a fresh instance of a registered rule set.
    ///
    /// # Errors
    /// Returns `UnknownRuleSet` if nothing is registered under the key.
    pub fn instantiate(&self, name: &str, version: &str) -> Result<RuleSetInstance> {
        let template = self.template(name, version).ok_or_else(|| {
            Error::new(ErrorKind::UnknownRuleSet {
                name: name.to_string(),
                version: version.to_string(),
            })
        })?;
        Ok(RuleSetInstance::new(name, version, template))
    }

    /// Returns the template under a key.
    #[must_use]
    pub fn template(&self, name: &str, version: &str) -> Option<Arc<RuleSetTemplate>> {
        self.templates
            .read()
            .get(&RuleSetKey::new(name, version))
            .cloned()
    }

    /// Returns true if a template is registered under the key.
    #[must_use]
    pub fn contains(&self, name: &str, version: &str) -> bool {
        self.templates
            .read()
            .contains_key(&RuleSetKey::new(name, version))
    }

    /// Removes and returns the template under a key.
    pub fn remove(&self, name: &str, version: &str) -> Option<Arc<RuleSetTemplate>> {
        let removed = self
            .templates
            .write()
            .remove(&RuleSetKey::new(name, version));
        if removed.is_some() {
            info!(rule_set = %RuleSetKey::new(name, version), "removed rule set");
        }
        removed
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<RuleSetKey> {
        let mut keys: Vec<_> = self.templates.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registered rule sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }
}
