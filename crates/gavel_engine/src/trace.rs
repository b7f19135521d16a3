//! Ring-buffered execution trace.
//!
//! A [`TraceRecorder`] is an [`ExecutionListener`] that keeps the most recent
//! events of an execution. The engine owns one when
//! [`EngineConfig::trace_buffer_size`](crate::EngineConfig) is non-zero.

use std::collections::VecDeque;
use std::fmt;

use gavel_foundation::Error;

use crate::engine::EngineState;
use crate::listener::ExecutionListener;

// =============================================================================
// Trace Event
// =============================================================================

/// Events recorded during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A cycle started.
    CycleStart,

    /// A rule's condition was evaluated.
    RuleEvaluated {
        /// The rule.
        rule: String,
        /// Whether the condition held.
        matched: bool,
    },

    /// All conditions of the cycle were evaluated.
    ConditionsEvaluated {
        /// Paths whose value moved since the cycle started, sorted.
        changed: Vec<String>,
    },

    /// A rule fired.
    RuleFired {
        /// The rule.
        rule: String,
        /// Its salience.
        salience: i64,
    },

    /// Execution ended.
    Finished {
        /// Final engine state.
        state: EngineState,
        /// Error message when execution aborted.
        error: Option<String>,
    },
}

impl TraceEvent {
    /// Short name of the event kind.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CycleStart => "cycle_start",
            Self::RuleEvaluated { .. } => "rule_evaluated",
            Self::ConditionsEvaluated { .. } => "conditions_evaluated",
            Self::RuleFired { .. } => "rule_fired",
            Self::Finished { .. } => "finished",
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleStart => write!(f, "cycle start"),
            Self::RuleEvaluated { rule, matched } => {
                write!(f, "eval {rule} -> {}", if *matched { "match" } else { "no match" })
            }
            Self::ConditionsEvaluated { changed } if changed.is_empty() => {
                write!(f, "changed: none")
            }
            Self::ConditionsEvaluated { changed } => write!(f, "changed: {}", changed.join(", ")),
            Self::RuleFired { rule, salience } => write!(f, "fire {rule} (salience {salience})"),
            Self::Finished { state, error: None } => write!(f, "finished: {state}"),
            Self::Finished {
                state,
                error: Some(error),
            } => write!(f, "finished: {state} ({error})"),
        }
    }
}

/// One trace entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Monotonic record id.
    pub id: u64,
    /// Cycle the event belongs to.
    pub cycle: u64,
    /// What happened.
    pub event: TraceEvent,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{:04} {}", self.cycle, self.event)
    }
}

// =============================================================================
// Recorder
// =============================================================================

/// Keeps the newest `capacity` trace records.
#[derive(Clone, Debug)]
pub struct TraceRecorder {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    next_id: u64,
    cycle: u64,
}

impl TraceRecorder {
    /// Creates a recorder holding at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 0,
            cycle: 0,
        }
    }

    fn push(&mut self, event: TraceEvent) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TraceRecord {
            id: self.next_id,
            cycle: self.cycle,
            event,
        });
        self.next_id += 1;
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops all records. Ids keep increasing.
    pub fn clear(&mut self) {
        self.records.clear();
        self.cycle = 0;
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Records for one cycle.
    #[must_use]
    pub fn records_for_cycle(&self, cycle: u64) -> Vec<&TraceRecord> {
        self.records.iter().filter(|r| r.cycle == cycle).collect()
    }

    /// The newest `count` records.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let start = self.records.len().saturating_sub(count);
        self.records.iter().skip(start).collect()
    }

    /// Names of fired rules still in the buffer, oldest first.
    #[must_use]
    pub fn fired_rules(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match &r.event {
                TraceEvent::RuleFired { rule, .. } => Some(rule.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Renders every record, one per line.
    #[must_use]
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ExecutionListener for TraceRecorder {
    fn on_begin_cycle(&mut self, cycle: u64) {
        self.cycle = cycle;
        self.push(TraceEvent::CycleStart);
    }

    fn on_evaluate_rule(&mut self, _cycle: u64, rule: &str, matched: bool) {
        self.push(TraceEvent::RuleEvaluated {
            rule: rule.to_string(),
            matched,
        });
    }

    fn on_conditions_evaluated(&mut self, _cycle: u64, changed: &[String]) {
        self.push(TraceEvent::ConditionsEvaluated {
            changed: changed.to_vec(),
        });
    }

    fn on_execute_rule(&mut self, _cycle: u64, rule: &str, salience: i64) {
        self.push(TraceEvent::RuleFired {
            rule: rule.to_string(),
            salience,
        });
    }

    fn on_finish(&mut self, _cycles: u64, state: EngineState, error: Option<&Error>) {
        self.push(TraceEvent::Finished {
            state,
            error: error.map(ToString::to_string),
        });
    }
}
