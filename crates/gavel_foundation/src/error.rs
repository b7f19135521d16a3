//! Error types for the Gavel rule engine.
//!
//! Uses `thiserror` for the error kinds. Errors raised by host fact methods
//! are carried as [`HostError`] and stay reachable through
//! [`std::error::Error::source`], so callers can test for a specific
//! underlying cause.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::types::{Arity, Type};

/// The main error type for Gavel operations.
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds a stack frame, creating the context if needed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an error for an operator applied to incompatible operands.
    #[must_use]
    pub fn invalid_operands(operator: impl Into<String>, left: Type, right: Type) -> Self {
        Self::new(ErrorKind::InvalidOperands {
            operator: operator.into(),
            left,
            right,
        })
    }

    /// Creates an unknown identifier error.
    #[must_use]
    pub fn unknown_identifier(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownIdentifier(name.into()))
    }

    /// Creates an unknown member error.
    #[must_use]
    pub fn unknown_member(target: impl Into<String>, member: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownMember {
            target: target.into(),
            member: member.into(),
        })
    }

    /// Creates an error for an assignment target that cannot be written.
    #[must_use]
    pub fn not_assignable(target: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAssignable(target.into()))
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(function: impl Into<String>, expected: Arity, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            function: function.into(),
            expected,
            actual,
        })
    }

    /// Wraps an error produced by a host fact method.
    #[must_use]
    pub fn host<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(ErrorKind::Host(HostError::new(error)))
    }

    /// Returns the host error carried by this error, if any.
    #[must_use]
    pub fn host_error(&self) -> Option<&HostError> {
        match &self.kind {
            ErrorKind::Host(host) => Some(host),
            _ => None,
        }
    }

    /// Downcasts the carried host error to a concrete type.
    #[must_use]
    pub fn downcast_host_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.host_error().and_then(HostError::downcast_ref)
    }

    /// Returns true if this error was raised by a host fact method.
    #[must_use]
    pub const fn is_host(&self) -> bool {
        matches!(self.kind, ErrorKind::Host(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(source) = self.context.as_ref().and_then(|c| c.source.as_ref()) {
            write!(f, " (in {source})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.host_error().map(HostError::as_error)
    }
}

impl From<HostError> for Error {
    fn from(host: HostError) -> Self {
        Self::new(ErrorKind::Host(host))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed rule text.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// Two rules with the same name in one rule set.
    #[error("duplicate rule name: {0}")]
    DuplicateRule(String),

    /// No rule set registered under the requested key.
    #[error("rule set not found: {name} version {version}")]
    UnknownRuleSet {
        /// Rule set name.
        name: String,
        /// Rule set version.
        version: String,
    },

    /// Rule source could not be loaded.
    #[error("resource error: {0}")]
    Resource(String),

    /// A fact name was bound twice in one context.
    #[error("fact already bound: {0}")]
    DuplicateFact(String),

    /// Identifier is not bound in the fact context.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// A resolved value has no attribute or method of the requested name.
    #[error("no such member: {member} on {target}")]
    UnknownMember {
        /// Rendering of the value that was accessed.
        target: String,
        /// The attribute or method name.
        member: String,
    },

    /// An assignment target cannot be written.
    #[error("cannot assign to {0}")]
    NotAssignable(String),

    /// Type mismatch during runtime type checking.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// Operator applied to operands it does not support.
    #[error("operator {operator} cannot be applied to {left} and {right}")]
    InvalidOperands {
        /// The operator symbol.
        operator: String,
        /// Type of the left operand.
        left: Type,
        /// Type of the right operand.
        right: Type,
    },

    /// A rule condition evaluated to something other than a boolean.
    #[error("condition of rule {rule} must be bool, got {actual}")]
    NonBooleanCondition {
        /// The rule whose condition was evaluated.
        rule: String,
        /// The type the condition produced.
        actual: Type,
    },

    /// Free function name is not a built-in.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments to a function.
    #[error("arity mismatch: {function} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Function name.
        function: String,
        /// Expected arity.
        expected: Arity,
        /// Actual number of arguments.
        actual: usize,
    },

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed.
    #[error("integer overflow in {0}")]
    Overflow(String),

    /// Error returned by a host fact method.
    #[error("{0}")]
    Host(HostError),

    /// The engine did not reach a fixpoint within the cycle ceiling.
    #[error("cycle limit exceeded: no fixpoint after {limit} cycles")]
    CycleLimitExceeded {
        /// The configured limit.
        limit: u64,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// An error raised by a host fact method, carried without wrapping.
///
/// Clones share the same underlying error, so [`HostError::ptr_eq`] can
/// compare identity across propagation.
#[derive(Clone)]
pub struct HostError(Arc<dyn std::error::Error + Send + Sync + 'static>);

impl HostError {
    /// Wraps a host error.
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Wraps an already shared host error, keeping its identity.
    #[must_use]
    pub fn from_shared(error: Arc<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self(error)
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn as_error(&self) -> &(dyn std::error::Error + 'static) {
        &*self.0
    }

    /// Returns the shared handle to the underlying error.
    #[must_use]
    pub fn shared(&self) -> &Arc<dyn std::error::Error + Send + Sync + 'static> {
        &self.0
    }

    /// Downcasts the underlying error to a concrete type.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.as_error().downcast_ref::<E>()
    }

    /// Returns true if both handles point at the same underlying error.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostError({:?})", self.0)
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Rule name or resource the error came from.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Stack of rules/statements being evaluated.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
