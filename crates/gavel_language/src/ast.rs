//! Abstract syntax tree for compiled GRL rules.
//!
//! A rule is a [`RuleDefinition`]: a boolean [`Expression`] condition plus an
//! ordered list of [`Statement`] actions. AST nodes are immutable once built
//! and are shared between rule set instances.
//!
//! `Display` renders every node back to canonical GRL text. The rendering of
//! a [`VariablePath`] is its working-memory fingerprint.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A literal value written in rule text.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// `nil`
    Nil,
    /// `true` or `false`
    Bool(bool),
    /// Integer literal like `42`
    Int(i64),
    /// Float literal like `3.14`
    Float(f64),
    /// String literal like `"hello"`
    String(String),
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

/// Infix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Returns the operator as written in rule text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Binding power; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }

    /// Returns true for `&&` and `||`.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Assignment operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
}

impl AssignOp {
    /// The arithmetic operator a compound assignment applies, if any.
    #[must_use]
    pub const fn binary(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::AddAssign => Some(BinaryOp::Add),
            Self::SubAssign => Some(BinaryOp::Sub),
            Self::MulAssign => Some(BinaryOp::Mul),
            Self::DivAssign => Some(BinaryOp::Div),
        }
    }

    /// Returns the operator as written in rule text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
        }
    }
}

/// A dotted path rooted at a fact or variable: `MF.Inner.Field`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariablePath {
    /// The identifier looked up in the data context.
    pub root: String,
    /// Member names resolved one after another.
    pub accessors: Vec<String>,
    /// Source location.
    pub span: Span,
}

impl VariablePath {
    /// Creates a path with no accessors.
    #[must_use]
    pub fn new(root: impl Into<String>, span: Span) -> Self {
        Self {
            root: root.into(),
            accessors: Vec::new(),
            span,
        }
    }

    /// Builds a path from a dotted string such as `MF.IntAttribute`.
    ///
    /// Returns `None` if any segment is empty.
    #[must_use]
    pub fn parse_dotted(path: &str) -> Option<Self> {
        let mut segments = path.split('.').map(str::trim);
        let root = segments.next().filter(|s| !s.is_empty())?;
        let accessors = segments
            .map(|s| (!s.is_empty()).then(|| s.to_string()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            root: root.to_string(),
            accessors,
            span: Span::default(),
        })
    }

    /// Appends an accessor.
    #[must_use]
    pub fn with_accessor(mut self, name: impl Into<String>) -> Self {
        self.accessors.push(name.into());
        self
    }

    /// Returns true if the path is a bare identifier.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Canonical string of the whole path.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        self.prefix_fingerprint(self.accessors.len())
    }

    /// Canonical string of the root plus the first `depth` accessors.
    #[must_use]
    pub fn prefix_fingerprint(&self, depth: usize) -> String {
        let mut out = self.root.clone();
        for accessor in self.accessors.iter().take(depth) {
            out.push('.');
            out.push_str(accessor);
        }
        out
    }

    /// Splits off the last accessor, returning the parent path and member.
    #[must_use]
    pub fn split_last(&self) -> Option<(Self, &str)> {
        let (last, rest) = self.accessors.split_last()?;
        let parent = Self {
            root: self.root.clone(),
            accessors: rest.to_vec(),
            span: self.span,
        };
        Some((parent, last.as_str()))
    }
}

impl fmt::Display for VariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for accessor in &self.accessors {
            write!(f, ".{accessor}")?;
        }
        Ok(())
    }
}

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    /// Literal constant.
    Literal(Literal, Span),
    /// Fact or variable path.
    Variable(VariablePath),
    /// Prefix operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expression>,
        /// Source location.
        span: Span,
    },
    /// Infix operator application.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
        /// Source location.
        span: Span,
    },
    /// Method invocation on a receiver: `R.GetSentence()`.
    MethodCall {
        /// Expression producing the receiver.
        receiver: Box<Expression>,
        /// Method name.
        method: String,
        /// Argument expressions, evaluated left to right.
        args: Vec<Expression>,
        /// Source location.
        span: Span,
    },
    /// Attribute read on a computed receiver: `R.Lookup("a").Name`.
    FieldAccess {
        /// Expression producing the receiver.
        receiver: Box<Expression>,
        /// Attribute name.
        field: String,
        /// Source location.
        span: Span,
    },
    /// Free function call: `Retract("Rule")`, `Changed(MF.X)`.
    BuiltinCall {
        /// Function name.
        name: String,
        /// Argument expressions.
        args: Vec<Expression>,
        /// Source location.
        span: Span,
    },
}

impl Expression {
    /// Returns the source span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Literal(_, span)
            | Self::Variable(VariablePath { span, .. })
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::MethodCall { span, .. }
            | Self::FieldAccess { span, .. }
            | Self::BuiltinCall { span, .. } => *span,
        }
    }

    /// Returns the variable path if this is a plain path expression.
    #[must_use]
    pub const fn as_variable(&self) -> Option<&VariablePath> {
        match self {
            Self::Variable(path) => Some(path),
            _ => None,
        }
    }

    /// Returns true if evaluating this expression calls a method or function.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::MethodCall { .. } | Self::BuiltinCall { .. })
    }
}

/// An action statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Statement {
    /// `Target = value;` and the compound forms.
    Assignment {
        /// Path written to.
        target: VariablePath,
        /// Assignment operator.
        op: AssignOp,
        /// Value expression.
        value: Expression,
        /// Source location.
        span: Span,
    },
    /// Expression evaluated for its side effect.
    Expression(Expression),
}

impl Statement {
    /// Returns the source span of this statement.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Assignment { span, .. } => *span,
            Self::Expression(expr) => expr.span(),
        }
    }
}

/// A compiled rule.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleDefinition {
    /// Rule name, unique within its rule set.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Priority (higher fires first).
    pub salience: i64,
    /// Condition that must evaluate to `true` for the rule to fire.
    pub condition: Expression,
    /// Actions executed in order when the rule fires.
    pub actions: Vec<Statement>,
    /// Source location of the whole rule.
    pub span: Span,
}

impl RuleDefinition {
    /// Creates a rule with no description and default salience.
    #[must_use]
    pub fn new(name: impl Into<String>, condition: Expression, actions: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            salience: 0,
            condition,
            actions,
            span: Span::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the salience (priority).
    #[must_use]
    pub fn with_salience(mut self, salience: i64) -> Self {
        self.salience = salience;
        self
    }
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
            Self::Neg => write!(f, "-"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expression]) -> fmt::Result {
    write!(f, "(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, ")")
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expression) -> fmt::Result {
    if matches!(expr, Expression::Binary { .. }) {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit, _) => write!(f, "{lit}"),
            Self::Variable(path) => write!(f, "{path}"),
            Self::Unary { op, operand, .. } => {
                write!(f, "{op}")?;
                write_operand(f, operand)
            }
            Self::Binary {
                op, left, right, ..
            } => {
                write_operand(f, left)?;
                write!(f, " {op} ")?;
                write_operand(f, right)
            }
            Self::MethodCall {
                receiver,
                method,
                args,
                ..
            } => {
                write_operand(f, receiver)?;
                write!(f, ".{method}")?;
                write_args(f, args)
            }
            Self::FieldAccess {
                receiver, field, ..
            } => {
                write_operand(f, receiver)?;
                write!(f, ".{field}")
            }
            Self::BuiltinCall { name, args, .. } => {
                write!(f, "{name}")?;
                write_args(f, args)
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignment {
                target, op, value, ..
            } => write!(f, "{target} {} {value};", op.symbol()),
            Self::Expression(expr) => write!(f, "{expr};"),
        }
    }
}

impl fmt::Display for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {} {:?} salience {} {{", self.name, self.description, self.salience)?;
        writeln!(f)?;
        writeln!(f, "    when")?;
        writeln!(f, "        {}", self.condition)?;
        writeln!(f, "    then")?;
        for action in &self.actions {
            writeln!(f, "        {action}")?;
        }
        write!(f, "}}")
    }
}
