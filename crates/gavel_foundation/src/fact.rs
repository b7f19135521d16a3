//! Capability interface for host objects exposed to rule text.
//!
//! Rule text addresses facts by name and member (`MF.IntAttribute`,
//! `R.GetSentence()`). Instead of runtime reflection, every host type that
//! should be reachable from rules implements [`Fact`] and answers attribute
//! reads, attribute writes, and method calls explicitly.
//!
//! Facts stay owned by the host. The host wraps a fact with [`fact_ref`],
//! keeps one handle for itself, and binds a clone into the data context.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::Result;
use crate::value::Value;

/// A host object that rule text can read, write, and call.
///
/// Each method returns `None` when the member does not exist. The evaluator
/// turns `None` into an "unknown member" error; a `Some(Err(..))` is passed
/// through to the caller unchanged.
pub trait Fact {
    /// Name of the host type, used in error messages.
    fn type_name(&self) -> &str;

    /// Reads an attribute.
    fn get_attribute(&self, name: &str) -> Option<Value>;

    /// Writes an attribute.
    ///
    /// The default implementation exposes no writable attributes.
    fn set_attribute(&mut self, name: &str, value: Value) -> Option<Result<()>> {
        let _ = (name, value);
        None
    }

    /// Invokes a method with already evaluated arguments.
    ///
    /// A method that fails returns `Some(Err(..))`; wrap host errors with
    /// [`Error::host`](crate::Error::host) so their identity survives.
    ///
    /// The default implementation exposes no methods.
    fn invoke_method(&mut self, name: &str, args: &[Value]) -> Option<Result<Value>> {
        let _ = (name, args);
        None
    }
}

/// Shared handle to a host fact.
pub type FactRef = Rc<RefCell<dyn Fact>>;

/// Wraps a fact in a shareable handle.
#[must_use]
pub fn fact_ref<F: Fact + 'static>(fact: F) -> Rc<RefCell<F>> {
    Rc::new(RefCell::new(fact))
}

/// Converts a concrete handle into a [`FactRef`] without copying the fact.
#[must_use]
pub fn as_fact_ref<F: Fact + 'static>(handle: &Rc<RefCell<F>>) -> FactRef {
    handle.clone()
}

impl fmt::Debug for dyn Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fact {}>", self.type_name())
    }
}

/// Extracts a typed argument or reports a type mismatch.
///
/// Convenience for `invoke_method` implementations.
///
/// # Errors
/// Returns a type mismatch error if the argument is missing or has the wrong type.
pub fn arg_str(args: &[Value], index: usize) -> Result<&str> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(crate::Error::type_mismatch(
            crate::Type::String,
            other.value_type(),
        )),
        None => Err(crate::Error::type_mismatch(
            crate::Type::String,
            crate::Type::Nil,
        )),
    }
}

/// Extracts an integer argument or reports a type mismatch.
///
/// # Errors
/// Returns a type mismatch error if the argument is missing or not an integer.
pub fn arg_int(args: &[Value], index: usize) -> Result<i64> {
    match args.get(index) {
        Some(Value::Int(n)) => Ok(*n),
        Some(other) => Err(crate::Error::type_mismatch(
            crate::Type::Int,
            other.value_type(),
        )),
        None => Err(crate::Error::type_mismatch(crate::Type::Int, crate::Type::Nil)),
    }
}
