//! Hooks into the engine loop.

use gavel_foundation::Error;

use crate::engine::EngineState;

/// Observer of engine execution.
///
/// Every hook has an empty default, so listeners implement only what they
/// need. Hooks run synchronously inside the engine loop.
#[allow(unused_variables)]
pub trait ExecutionListener {
    /// A cycle is starting.
    fn on_begin_cycle(&mut self, cycle: u64) {}

    /// A rule's condition was evaluated.
    fn on_evaluate_rule(&mut self, cycle: u64, rule: &str, matched: bool) {}

    /// Every active condition of `cycle` was evaluated. `changed` lists the
    /// paths read this cycle whose value differs from the cycle start, sorted.
    fn on_conditions_evaluated(&mut self, cycle: u64, changed: &[String]) {}

    /// A rule was selected and its actions are about to run.
    fn on_execute_rule(&mut self, cycle: u64, rule: &str, salience: i64) {}

    /// Execution ended in `state`; `error` is set when it aborted.
    fn on_finish(&mut self, cycles: u64, state: EngineState, error: Option<&Error>) {}
}
