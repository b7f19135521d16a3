//! Type descriptors for runtime type checking.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Runtime type of a [`Value`](crate::Value).
///
/// Fact types are dynamic, so rule text is type-checked as it is evaluated
/// rather than when it is compiled.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The nil type (only value: nil).
    Nil,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// Host object exposed through the fact capability interface.
    Fact,
    /// Any numeric type (used in error messages for arithmetic operators).
    Number,
    /// Any type.
    Any,
}

/// Function arity specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Arity {
    /// Exactly N arguments.
    Exact(usize),
    /// Between min and max arguments (inclusive).
    Range(usize, usize),
    /// At least N arguments, then any number more.
    Variadic(usize),
}

impl Type {
    /// Returns true if this type is numeric.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Number)
    }

    /// Checks if a value of `value_type` is accepted where `self` is expected.
    ///
    /// `Float` accepts `Int` (numeric promotion); `Number` accepts both.
    #[must_use]
    pub fn accepts(&self, value_type: &Type) -> bool {
        match (self, value_type) {
            (Self::Any, _)
            | (Self::Nil, Self::Nil)
            | (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::Float | Self::Number, Self::Int | Self::Float)
            | (Self::String, Self::String)
            | (Self::Fact, Self::Fact) => true,
            _ => false,
        }
    }
}

impl Arity {
    /// Returns true if `count` arguments satisfy this arity.
    #[must_use]
    pub const fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::Variadic(min) => count >= min,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Fact => write!(f, "fact"),
            Self::Number => write!(f, "number"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(min, max) => write!(f, "{min} to {max}"),
            Self::Variadic(min) => write!(f, "at least {min}"),
        }
    }
}
