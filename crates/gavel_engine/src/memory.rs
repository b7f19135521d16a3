//! Working memory: per-execution record of observed path values.
//!
//! The evaluator records the value of every variable path it reads, keyed by
//! the path fingerprint (`MF.IntAttribute`). At the start of each cycle the
//! engine freezes the current values as the cycle-start snapshot; `Changed`
//! compares a fresh read against that snapshot.
//!
//! Both maps are persistent (`im::HashMap`), so taking a snapshot shares
//! structure instead of copying entries.

use gavel_foundation::Value;
use im::HashMap;

/// Observed values for one execution.
#[derive(Clone, Debug, Default)]
pub struct WorkingMemory {
    current: HashMap<String, Value>,
    snapshot: HashMap<String, Value>,
}

impl WorkingMemory {
    /// Creates an empty working memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `path` at the start of the current cycle.
    #[must_use]
    pub fn snapshot(&self, path: &str) -> Option<&Value> {
        self.snapshot.get(path)
    }

    /// Most recently observed value of `path`.
    #[must_use]
    pub fn current(&self, path: &str) -> Option<&Value> {
        self.current.get(path)
    }

    /// Records an observed value.
    pub fn update(&mut self, path: impl Into<String>, value: Value) {
        self.current.insert(path.into(), value);
    }

    /// Returns true if `path` was not seen at cycle start or now differs.
    #[must_use]
    pub fn has_changed(&self, path: &str) -> bool {
        match (self.snapshot.get(path), self.current.get(path)) {
            (Some(before), Some(now)) => before != now,
            _ => true,
        }
    }

    /// Drops `path` and every path beneath it from both maps.
    pub fn forget(&mut self, path: &str) {
        let nested = format!("{path}.");
        let keep = |key: &String, _: &Value| key != path && !key.starts_with(&nested);
        self.current.retain(keep);
        self.snapshot.retain(keep);
    }

    /// Freezes current values as the cycle-start snapshot.
    pub fn begin_cycle(&mut self) {
        self.snapshot = self.current.clone();
    }

    /// Clears all entries.
    pub fn reset(&mut self) {
        self.current.clear();
        self.snapshot.clear();
    }

    /// Paths whose current value differs from the cycle-start snapshot, sorted.
    #[must_use]
    pub fn changed_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .current
            .keys()
            .filter(|path| self.has_changed(path))
            .cloned()
            .collect();
        paths.sort_unstable();
        paths
    }

    /// Returns true if nothing changed since the cycle started.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.current.keys().all(|path| !self.has_changed(path))
    }

    /// Number of tracked paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns true if no paths are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
