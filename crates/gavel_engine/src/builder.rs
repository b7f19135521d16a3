//! Compiles rule text into a library entry.

use std::sync::Arc;

use gavel_foundation::Result;
use gavel_language::compile;
use tracing::{debug, instrument};

use crate::knowledge::RuleSetTemplate;
use crate::library::RuleLibrary;
use crate::resource::Resource;

/// Builds rule sets into a [`RuleLibrary`].
///
/// Each build compiles the source completely before touching the library, so
/// a parse error or a duplicate rule name leaves the library as it was.
#[derive(Clone, Copy, Debug)]
pub struct RuleBuilder<'lib> {
    library: &'lib RuleLibrary,
}

impl<'lib> RuleBuilder<'lib> {
    /// Creates a builder writing into `library`.
    #[must_use]
    pub fn new(library: &'lib RuleLibrary) -> Self {
        Self { library }
    }

    /// Compiles `source` and merges its rules into the rule set under
    /// (`name`, `version`).
    ///
    /// # Errors
    /// Returns a parse error for malformed source or `DuplicateRule` if a rule
    /// name is repeated or already present in the rule set.
    #[instrument(skip(self, source), fields(source_len = source.len()))]
    pub fn build_from_source(
        &self,
        name: &str,
        version: &str,
        source: &str,
    ) -> Result<Arc<RuleSetTemplate>> {
        let rules = compile(source)?;
        debug!(rules = rules.len(), "compiled rule source");
        self.library.merge(name, version, rules)
    }

    /// Loads text from a resource and builds it like
    /// [`build_from_source`](Self::build_from_source).
    ///
    /// # Errors
    /// Returns a `Resource` error if loading fails, otherwise as
    /// `build_from_source`.
    #[instrument(skip(self, resource), fields(resource = %resource.describe()))]
    pub fn build_from_resource<R: Resource>(
        &self,
        name: &str,
        version: &str,
        resource: &R,
    ) -> Result<Arc<RuleSetTemplate>> {
        let source = resource.load()?;
        self.build_from_source(name, version, &source)
    }
}
