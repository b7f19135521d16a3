//! Visitor for traversing rule ASTs.
//!
//! Implement [`ExpressionVisitor`] and drive it with [`walk_expression`],
//! [`walk_statement`], or [`walk_rule`]. The default `visit_*` methods do
//! nothing, so visitors only override the nodes they care about.
//!
//! # Example
//!
//! ```
//! use gavel_language::{parse_expression, VariablePath};
//! use gavel_language::visitor::{ExpressionVisitor, walk_expression};
//!
//! struct PathCounter(usize);
//!
//! impl ExpressionVisitor for PathCounter {
//!     fn visit_variable(&mut self, _path: &VariablePath) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let expr = parse_expression("MF.A + MF.B > R.Limit()").unwrap();
//! let mut counter = PathCounter(0);
//! walk_expression(&mut counter, &expr);
//! assert_eq!(counter.0, 3); // MF.A, MF.B, and the receiver R
//! ```

use crate::ast::{Expression, Literal, RuleDefinition, Statement, VariablePath};
use crate::span::Span;

/// Trait for read-only expression visitors.
#[allow(unused_variables)]
pub trait ExpressionVisitor {
    /// Visit a literal.
    fn visit_literal(&mut self, literal: &Literal, span: Span) {}

    /// Visit a variable path.
    fn visit_variable(&mut self, path: &VariablePath) {}

    /// Visit a method call (before its receiver and arguments).
    fn visit_method_call(&mut self, method: &str, args: &[Expression], span: Span) {}

    /// Visit a free function call (before its arguments).
    fn visit_builtin_call(&mut self, name: &str, args: &[Expression], span: Span) {}

    /// Visit an assignment target.
    fn visit_assignment_target(&mut self, target: &VariablePath) {}
}

/// Walks an expression depth-first, left to right.
pub fn walk_expression<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Literal(literal, span) => visitor.visit_literal(literal, *span),
        Expression::Variable(path) => visitor.visit_variable(path),
        Expression::Unary { operand, .. } => walk_expression(visitor, operand),
        Expression::Binary { left, right, .. } => {
            walk_expression(visitor, left);
            walk_expression(visitor, right);
        }
        Expression::MethodCall {
            receiver,
            method,
            args,
            span,
        } => {
            visitor.visit_method_call(method, args, *span);
            walk_expression(visitor, receiver);
            for arg in args {
                walk_expression(visitor, arg);
            }
        }
        Expression::FieldAccess { receiver, .. } => walk_expression(visitor, receiver),
        Expression::BuiltinCall { name, args, span } => {
            visitor.visit_builtin_call(name, args, *span);
            for arg in args {
                walk_expression(visitor, arg);
            }
        }
    }
}

/// Walks a statement.
pub fn walk_statement<V: ExpressionVisitor + ?Sized>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Assignment { target, value, .. } => {
            visitor.visit_assignment_target(target);
            walk_expression(visitor, value);
        }
        Statement::Expression(expr) => walk_expression(visitor, expr),
    }
}

/// Walks a rule's condition and then its actions.
pub fn walk_rule<V: ExpressionVisitor + ?Sized>(visitor: &mut V, rule: &RuleDefinition) {
    walk_expression(visitor, &rule.condition);
    for action in &rule.actions {
        walk_statement(visitor, action);
    }
}

/// Collects the distinct variable paths read by an expression, in first-seen order.
#[must_use]
pub fn referenced_paths(expr: &Expression) -> Vec<String> {
    #[derive(Default)]
    struct Collector(Vec<String>);

    impl ExpressionVisitor for Collector {
        fn visit_variable(&mut self, path: &VariablePath) {
            let fingerprint = path.fingerprint();
            if !self.0.contains(&fingerprint) {
                self.0.push(fingerprint);
            }
        }
    }

    let mut collector = Collector::default();
    walk_expression(&mut collector, expr);
    collector.0
}
