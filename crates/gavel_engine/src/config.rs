//! Engine configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default ceiling on rule firings per execution.
pub const DEFAULT_MAX_CYCLES: u64 = 5000;

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Maximum number of rules fired in one execution.
    pub max_cycles: u64,

    /// Trace ring buffer size in records (0 = tracing off).
    pub trace_buffer_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            trace_buffer_size: 0,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A low cycle ceiling that surfaces runaway rule sets quickly.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_cycles: 100,
            ..Self::default()
        }
    }

    /// Default limits with a trace of the last 1000 events.
    #[must_use]
    pub fn traced() -> Self {
        Self {
            trace_buffer_size: 1000,
            ..Self::default()
        }
    }

    /// Builder method to set the cycle ceiling.
    #[must_use]
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Builder method to set the trace buffer size.
    #[must_use]
    pub fn with_trace_buffer_size(mut self, size: usize) -> Self {
        self.trace_buffer_size = size;
        self
    }

    /// Returns true if the engine should record a trace.
    #[must_use]
    pub fn tracing_enabled(&self) -> bool {
        self.trace_buffer_size > 0
    }
}
