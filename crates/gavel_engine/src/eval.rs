//! Expression and statement evaluation against a fact context.
//!
//! The [`Evaluator`] walks the AST directly. Variable path reads are recorded
//! in the instance's working memory; assignments write through the [`Fact`]
//! capability interface. The first error aborts the current statement
//! sequence and earlier writes stay in place.
//!
//! [`Fact`]: gavel_foundation::Fact

use std::cell::{Ref, RefMut};

use gavel_foundation::{Arity, Error, ErrorKind, Fact, FactRef, Result, Type, Value};
use gavel_language::{AssignOp, BinaryOp, Expression, Literal, Statement, VariablePath};
use gavel_stdlib::FunctionRegistry;
use tracing::warn;

use crate::context::DataContext;
use crate::knowledge::RuleSetInstance;
use crate::ops;

// =============================================================================
// Member access
// =============================================================================

fn borrow_fact(fact: &FactRef) -> Result<Ref<'_, dyn Fact + 'static>> {
    fact.try_borrow()
        .map_err(|_| Error::new(ErrorKind::Internal("fact is already borrowed".to_string())))
}

fn borrow_fact_mut(fact: &FactRef) -> Result<RefMut<'_, dyn Fact + 'static>> {
    fact.try_borrow_mut()
        .map_err(|_| Error::new(ErrorKind::Internal("fact is already borrowed".to_string())))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Fact(fact) => borrow_fact(fact)
            .map_or_else(|_| "fact".to_string(), |f| f.type_name().to_string()),
        other => format!("{other:?}"),
    }
}

/// Reads `member` from a value: an attribute, else a zero-argument method.
///
/// # Errors
/// Returns `UnknownMember` if the value is not a fact or has no such member,
/// or the host error raised by the method.
pub(crate) fn read_member(target: &Value, member: &str) -> Result<Value> {
    let Value::Fact(fact) = target else {
        return Err(Error::unknown_member(describe(target), member));
    };
    if let Some(value) = borrow_fact(fact)?.get_attribute(member) {
        return Ok(value);
    }
    let mut fact = borrow_fact_mut(fact)?;
    match fact.invoke_method(member, &[]) {
        Some(result) => result,
        None => Err(Error::unknown_member(fact.type_name(), member)),
    }
}

/// Invokes a method on a fact value.
fn invoke(target: &Value, method: &str, args: &[Value]) -> Result<Value> {
    let Value::Fact(fact) = target else {
        return Err(Error::unknown_member(describe(target), method));
    };
    let mut fact = borrow_fact_mut(fact)?;
    match fact.invoke_method(method, args) {
        Some(result) => result,
        None => Err(Error::unknown_member(fact.type_name(), method)),
    }
}

/// Writes `member` on a fact: an attribute setter, else a one-argument method.
fn write_member(target: &Value, member: &str, value: Value, path: &VariablePath) -> Result<()> {
    let Value::Fact(fact) = target else {
        return Err(Error::not_assignable(path.fingerprint()));
    };
    let mut fact = borrow_fact_mut(fact)?;
    if let Some(result) = fact.set_attribute(member, value.clone()) {
        return result;
    }
    match fact.invoke_method(member, &[value]) {
        Some(result) => result.map(drop),
        None => Err(Error::not_assignable(path.fingerprint())),
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Evaluates rule expressions and executes rule actions.
pub struct Evaluator<'a> {
    context: &'a mut DataContext,
    instance: &'a mut RuleSetInstance,
    functions: &'a FunctionRegistry,
    complete_requested: bool,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over a context and a rule set instance.
    pub fn new(
        context: &'a mut DataContext,
        instance: &'a mut RuleSetInstance,
        functions: &'a FunctionRegistry,
    ) -> Self {
        Self {
            context,
            instance,
            functions,
            complete_requested: false,
        }
    }

    /// The rule set instance being evaluated.
    #[must_use]
    pub fn instance(&self) -> &RuleSetInstance {
        self.instance
    }

    /// Mutable access to the rule set instance.
    pub fn instance_mut(&mut self) -> &mut RuleSetInstance {
        self.instance
    }

    /// The fact context.
    #[must_use]
    pub fn context(&self) -> &DataContext {
        self.context
    }

    /// Returns true once `Complete()` has run.
    #[must_use]
    pub fn complete_requested(&self) -> bool {
        self.complete_requested
    }

    /// Evaluates an expression.
    ///
    /// # Errors
    /// Returns the first error raised while evaluating any subexpression.
    pub fn evaluate(&mut self, expr: &Expression) -> Result<Value> {
        match expr {
            Expression::Literal(literal, _) => Ok(literal_value(literal)),
            Expression::Variable(path) => self.read_path(path),
            Expression::Unary { op, operand, .. } => {
                let value = self.evaluate(operand)?;
                ops::unary(*op, &value)
            }
            Expression::Binary {
                op, left, right, ..
            } => self.evaluate_binary(*op, left, right),
            Expression::MethodCall {
                receiver,
                method,
                args,
                ..
            } => {
                let target = self.evaluate(receiver)?;
                let args = self.evaluate_args(args)?;
                invoke(&target, method, &args)
            }
            Expression::FieldAccess {
                receiver, field, ..
            } => {
                let target = self.evaluate(receiver)?;
                read_member(&target, field)
            }
            Expression::BuiltinCall { name, args, .. } => self.call_builtin(name, args),
        }
    }

    /// Executes one statement.
    ///
    /// # Errors
    /// Returns the first error raised while executing the statement.
    pub fn execute(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Assignment {
                target, op, value, ..
            } => self.assign(target, *op, value),
            Statement::Expression(expr) => self.evaluate(expr).map(drop),
        }
    }

    /// Executes statements in order, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first statement error; earlier statements are not undone.
    pub fn execute_all(&mut self, stmts: &[Statement]) -> Result<()> {
        stmts.iter().try_for_each(|stmt| self.execute(stmt))
    }

    fn evaluate_args(&mut self, args: &[Expression]) -> Result<Vec<Value>> {
        args.iter().map(|arg| self.evaluate(arg)).collect()
    }

    fn evaluate_binary(
        &mut self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<Value> {
        let lhs = self.evaluate(left)?;
        if op.is_logical() {
            let lhs = ops::expect_bool(&lhs)?;
            let short_circuit = match op {
                BinaryOp::And => !lhs,
                _ => lhs,
            };
            if short_circuit {
                return Ok(Value::Bool(lhs));
            }
            let rhs = self.evaluate(right)?;
            return ops::expect_bool(&rhs).map(Value::Bool);
        }
        let rhs = self.evaluate(right)?;
        ops::binary(op, &lhs, &rhs)
    }

    /// Reads a path, recording every prefix in working memory.
    fn read_path(&mut self, path: &VariablePath) -> Result<Value> {
        let mut value = self
            .context
            .resolve(&path.root)
            .ok_or_else(|| Error::unknown_identifier(&path.root))?;
        let memory = self.instance.memory_mut();
        memory.update(path.root.clone(), value.clone());
        for (depth, accessor) in path.accessors.iter().enumerate() {
            value = read_member(&value, accessor)?;
            memory.update(path.prefix_fingerprint(depth + 1), value.clone());
        }
        Ok(value)
    }

    fn assign(&mut self, target: &VariablePath, op: AssignOp, value: &Expression) -> Result<()> {
        let value = match op.binary() {
            Some(binary) => {
                let current = self.read_path(target)?;
                let operand = self.evaluate(value)?;
                ops::binary(binary, &current, &operand)?
            }
            None => self.evaluate(value)?,
        };

        match target.split_last() {
            None if self.context.contains(&target.root) => {
                Err(Error::not_assignable(&target.root))
            }
            None => {
                self.context.set_variable(target.root.clone(), value);
                Ok(())
            }
            Some((parent, member)) => {
                let owner = self.read_path(&parent)?;
                write_member(&owner, member, value, target)
            }
        }
    }

    fn call_builtin(&mut self, name: &str, args: &[Expression]) -> Result<Value> {
        match name {
            "Retract" => {
                let [arg] = args else {
                    return Err(Error::arity_mismatch(name, Arity::Exact(1), args.len()));
                };
                let rule = self.evaluate(arg)?;
                let Some(rule) = rule.as_str() else {
                    return Err(Error::type_mismatch(Type::String, rule.value_type()));
                };
                if !self.instance.retract(rule) {
                    warn!(rule, rule_set = self.instance.name(), "retract of unknown rule ignored");
                }
                Ok(Value::Nil)
            }
            "Changed" => {
                let path = path_argument(name, args)?;
                self.read_path(path)?;
                Ok(Value::Bool(
                    self.instance.memory().has_changed(&path.fingerprint()),
                ))
            }
            "Forget" => {
                let path = path_argument(name, args)?;
                self.instance.memory_mut().forget(&path.fingerprint());
                Ok(Value::Nil)
            }
            "Complete" => {
                if !args.is_empty() {
                    return Err(Error::arity_mismatch(name, Arity::Exact(0), args.len()));
                }
                self.complete_requested = true;
                Ok(Value::Nil)
            }
            _ => {
                if !self.functions.contains(name) {
                    return Err(Error::new(ErrorKind::UnknownFunction(name.to_string())));
                }
                let args = self.evaluate_args(args)?;
                self.functions.call(name, &args)
            }
        }
    }
}

fn path_argument<'e>(name: &str, args: &'e [Expression]) -> Result<&'e VariablePath> {
    let [arg] = args else {
        return Err(Error::arity_mismatch(name, Arity::Exact(1), args.len()));
    };
    arg.as_variable().ok_or_else(|| {
        Error::new(ErrorKind::Internal(format!(
            "{name} expects a variable path, got {arg}"
        )))
    })
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Nil => Value::Nil,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::String(s) => Value::from(s.as_str()),
    }
}
