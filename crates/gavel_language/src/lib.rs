//! Lexer, parser, and AST for GRL, the Gavel rule language.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of rule source
//! - [`Parser`] - Parsing tokens into [`RuleDefinition`]s
//! - [`compile`] - Parsing plus the build-time checks on built-in calls
//! - [`visitor`] - Read-only traversal of expressions and rules
//!
//! ```text
//! rule CheckValues "Check the default values" salience 10 {
//!     when
//!         MF.IntAttribute == 123 && MF.StringAttribute == "Some string value"
//!     then
//!         MF.WhatToSay = MF.GetWhatToSay("hello");
//!         Retract("CheckValues");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
pub mod visitor;

pub use ast::{
    AssignOp, BinaryOp, Expression, Literal, RuleDefinition, Statement, UnaryOp, VariablePath,
};
pub use lexer::Lexer;
pub use parser::{Parser, parse, parse_expression};
pub use span::Span;
pub use token::{Token, TokenKind};

use gavel_foundation::{Error, ErrorKind, Result};

use visitor::{ExpressionVisitor, walk_rule};

/// Built-ins whose single argument must be a variable path.
const PATH_BUILTINS: &[&str] = &["Changed", "Forget"];

/// Compiles rule source into rule definitions.
///
/// Parses the source and rejects built-in calls that can never succeed:
/// `Changed`/`Forget` need exactly one variable path argument and `Retract`
/// needs exactly one argument.
///
/// # Errors
/// Returns a parse error for malformed source or misused built-ins.
pub fn compile(source: &str) -> Result<Vec<RuleDefinition>> {
    let rules = parse(source)?;

    let mut checker = BuiltinChecker {
        source,
        error: None,
    };
    for rule in &rules {
        walk_rule(&mut checker, rule);
        if let Some(error) = checker.error.take() {
            return Err(error.in_frame(format!("rule {}", rule.name)));
        }
    }
    Ok(rules)
}

/// Validates the argument shape of engine built-ins.
struct BuiltinChecker<'src> {
    source: &'src str,
    error: Option<Error>,
}

impl BuiltinChecker<'_> {
    fn fail(&mut self, span: Span, message: String) {
        if self.error.is_none() {
            self.error = Some(Error::new(ErrorKind::ParseError {
                message,
                line: span.line,
                column: span.column,
                context: span.line_text(self.source).to_string(),
            }));
        }
    }
}

impl ExpressionVisitor for BuiltinChecker<'_> {
    fn visit_builtin_call(&mut self, name: &str, args: &[Expression], span: Span) {
        if PATH_BUILTINS.contains(&name) {
            if args.len() != 1 || args[0].as_variable().is_none() {
                self.fail(span, format!("{name} expects a single variable path"));
            }
        } else if name == "Retract" && args.len() != 1 {
            self.fail(span, "Retract expects a single rule name".to_string());
        }
    }
}
