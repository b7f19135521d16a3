//! The cycle-based rule engine.
//!
//! Each cycle re-evaluates the condition of every non-retracted rule, picks
//! the eligible rule with the highest salience (ties go to the rule declared
//! first), and runs its actions. Execution ends when no rule is eligible,
//! when an action calls `Complete()`, when any evaluation fails, or when the
//! cycle ceiling is reached.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gavel_foundation::{Error, ErrorContext, ErrorKind, Result, Value};
use gavel_language::RuleDefinition;
use gavel_stdlib::FunctionRegistry;
use tracing::{debug, info, instrument, trace};

use crate::config::EngineConfig;
use crate::context::DataContext;
use crate::eval::Evaluator;
use crate::knowledge::RuleSetInstance;
use crate::listener::ExecutionListener;
use crate::trace::TraceRecorder;

// =============================================================================
// State and results
// =============================================================================

/// Lifecycle of an execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EngineState {
    /// Nothing has run yet.
    #[default]
    Idle,
    /// An execution is in progress.
    Running,
    /// The last execution reached a fixpoint or was completed by a rule.
    Completed,
    /// The last execution stopped on an error.
    Aborted,
}

impl EngineState {
    /// Returns true for `Completed` and `Aborted`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Outcome of a successful execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionSummary {
    /// Cycles evaluated, including the final one where nothing fired.
    pub cycles: u64,
    /// Fired rule names in firing order.
    pub fired: Vec<String>,
    /// Final state (always `Completed`).
    pub state: EngineState,
}

/// A rule whose condition currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleMatch {
    /// Rule name.
    pub name: String,
    /// Rule salience.
    pub salience: i64,
    /// Declaration index within the rule set.
    pub index: usize,
}

// =============================================================================
// Listeners
// =============================================================================

/// The built-in trace recorder plus user listeners.
#[derive(Default)]
struct Listeners {
    recorder: Option<TraceRecorder>,
    hooks: Vec<Box<dyn ExecutionListener>>,
}

impl Listeners {
    fn is_empty(&self) -> bool {
        self.recorder.is_none() && self.hooks.is_empty()
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn ExecutionListener)) {
        if let Some(recorder) = &mut self.recorder {
            f(recorder);
        }
        for hook in &mut self.hooks {
            f(hook.as_mut());
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Runs rule set instances against fact contexts.
pub struct Engine {
    config: EngineConfig,
    functions: FunctionRegistry,
    listeners: Listeners,
    state: EngineState,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("listeners", &self.listeners.hooks.len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine with the standard function library.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let recorder = config
            .tracing_enabled()
            .then(|| TraceRecorder::new(config.trace_buffer_size));
        Self {
            config,
            functions: FunctionRegistry::with_defaults(),
            listeners: Listeners {
                recorder,
                hooks: Vec::new(),
            },
            state: EngineState::Idle,
        }
    }

    /// Replaces the function library.
    #[must_use]
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// Mutable access to the function library, for registering host functions.
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Adds a listener notified during every execution.
    pub fn add_listener(&mut self, listener: Box<dyn ExecutionListener>) {
        self.listeners.hooks.push(listener);
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// State of the most recent execution.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Trace of the most recent execution, when tracing is enabled.
    #[must_use]
    pub fn trace(&self) -> Option<&TraceRecorder> {
        self.listeners.recorder.as_ref()
    }

    /// Runs `instance` against `context` until no rule is eligible.
    ///
    /// Working memory and rule-local variables start empty. Retraction flags
    /// carry over from earlier executions of the same instance.
    ///
    /// # Errors
    /// Returns the first evaluation error, a `NonBooleanCondition` for a
    /// condition that is not a bool, or `CycleLimitExceeded` when a rule is
    /// still eligible after `max_cycles` firings. The engine state is then
    /// `Aborted`.
    #[instrument(skip_all, fields(rule_set = %instance.name(), version = %instance.version()))]
    pub fn execute(
        &mut self,
        context: &mut DataContext,
        instance: &mut RuleSetInstance,
    ) -> Result<ExecutionSummary> {
        self.state = EngineState::Running;
        if let Some(recorder) = &mut self.listeners.recorder {
            recorder.clear();
        }
        instance.memory_mut().reset();
        context.clear_variables();

        let mut cycle = 0;
        let result = self.run_cycles(context, instance, &mut cycle);

        self.state = match result {
            Ok(_) => EngineState::Completed,
            Err(_) => EngineState::Aborted,
        };
        let state = self.state;
        let error = result.as_ref().err();
        self.listeners
            .each(|listener| listener.on_finish(cycle, state, error));

        match &result {
            Ok(fired) => info!(cycles = cycle, fired = fired.len(), "execution completed"),
            Err(error) => debug!(cycles = cycle, %error, "execution aborted"),
        }

        result.map(|fired| ExecutionSummary {
            cycles: cycle,
            fired,
            state,
        })
    }

    fn run_cycles(
        &mut self,
        context: &mut DataContext,
        instance: &mut RuleSetInstance,
        cycle: &mut u64,
    ) -> Result<Vec<String>> {
        let max_cycles = self.config.max_cycles;
        let listeners = &mut self.listeners;
        let mut evaluator = Evaluator::new(context, instance, &self.functions);
        let mut fired = Vec::new();

        loop {
            *cycle += 1;
            evaluator.instance_mut().memory_mut().begin_cycle();
            let current = *cycle;
            listeners.each(|listener| listener.on_begin_cycle(current));

            let Some((_, rule)) = select(&mut evaluator, current, listeners)? else {
                debug!(cycle = current, "no eligible rule");
                return Ok(fired);
            };

            if u64::try_from(fired.len()).unwrap_or(u64::MAX) >= max_cycles {
                return Err(Error::new(ErrorKind::CycleLimitExceeded { limit: max_cycles })
                    .in_frame(format!("rule {}", rule.name)));
            }

            debug!(cycle = current, rule = %rule.name, salience = rule.salience, "firing rule");
            listeners.each(|listener| listener.on_execute_rule(current, &rule.name, rule.salience));
            evaluator
                .execute_all(&rule.actions)
                .map_err(|error| in_rule(error, &rule))?;
            fired.push(rule.name.clone());

            if evaluator.complete_requested() {
                debug!(cycle = current, rule = %rule.name, "completion requested");
                return Ok(fired);
            }
        }
    }

    /// Returns the rules whose conditions currently hold, highest salience
    /// first, without firing any of them.
    ///
    /// Uses a fresh working memory and does not change the engine state.
    ///
    /// # Errors
    /// Returns the first condition evaluation error.
    pub fn fetch_matching_rules(
        &self,
        context: &mut DataContext,
        instance: &mut RuleSetInstance,
    ) -> Result<Vec<RuleMatch>> {
        instance.memory_mut().reset();
        instance.memory_mut().begin_cycle();
        let mut evaluator = Evaluator::new(context, instance, &self.functions);

        let mut matches = Vec::new();
        for (index, rule) in evaluator.instance().active_rules() {
            if check_condition(&mut evaluator, &rule)? {
                matches.push(RuleMatch {
                    name: rule.name.clone(),
                    salience: rule.salience,
                    index,
                });
            }
        }
        matches.sort_by(|a, b| b.salience.cmp(&a.salience));
        Ok(matches)
    }
}

/// Evaluates every active condition and returns the rule to fire.
fn select(
    evaluator: &mut Evaluator<'_>,
    cycle: u64,
    listeners: &mut Listeners,
) -> Result<Option<(usize, Arc<RuleDefinition>)>> {
    let mut best: Option<(usize, Arc<RuleDefinition>)> = None;
    for (index, rule) in evaluator.instance().active_rules() {
        let matched = check_condition(evaluator, &rule)?;
        trace!(cycle, rule = %rule.name, matched, "evaluated condition");
        listeners.each(|listener| listener.on_evaluate_rule(cycle, &rule.name, matched));
        if matched && best.as_ref().is_none_or(|(_, b)| rule.salience > b.salience) {
            best = Some((index, rule));
        }
    }

    let memory = evaluator.instance().memory();
    trace!(cycle, stable = memory.is_stable(), "conditions evaluated");
    if !listeners.is_empty() {
        let changed = memory.changed_paths();
        listeners.each(|listener| listener.on_conditions_evaluated(cycle, &changed));
    }
    Ok(best)
}

fn check_condition(evaluator: &mut Evaluator<'_>, rule: &RuleDefinition) -> Result<bool> {
    match evaluator
        .evaluate(&rule.condition)
        .map_err(|error| in_rule(error, rule))?
    {
        Value::Bool(matched) => Ok(matched),
        other => Err(in_rule(
            Error::new(ErrorKind::NonBooleanCondition {
                rule: rule.name.clone(),
                actual: other.value_type(),
            }),
            rule,
        )),
    }
}

/// Attaches the rule to an error's context, keeping the error kind.
fn in_rule(error: Error, rule: &RuleDefinition) -> Error {
    let frame = format!("rule {}", rule.name);
    match error.context {
        Some(_) => error.in_frame(frame),
        None => error.with_context(
            ErrorContext::new()
                .with_source(frame.clone())
                .with_frame(frame),
        ),
    }
}
