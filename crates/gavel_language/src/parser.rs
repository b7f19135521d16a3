//! Parser for GRL.
//!
//! A recursive-descent parser that turns rule source into
//! [`RuleDefinition`]s. Expressions use precedence climbing over
//! [`BinaryOp::precedence`].

use gavel_foundation::{Error, ErrorKind, Result};

use crate::ast::{
    AssignOp, BinaryOp, Expression, Literal, RuleDefinition, Statement, UnaryOp, VariablePath,
};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for GRL source code.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Span of the most recently consumed token.
    previous: Span,
    /// Source text (for error messages).
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let mut parser = Self {
            lexer,
            current,
            previous: Span::at_start(),
            source,
        };
        parser.skip_trivia();
        parser
    }

    /// Parses every rule in the source.
    ///
    /// # Errors
    /// Returns a parse error at the first malformed construct.
    pub fn parse_rules(&mut self) -> Result<Vec<RuleDefinition>> {
        let mut rules = Vec::new();
        while self.current.kind != TokenKind::Eof {
            rules.push(self.parse_rule()?);
        }
        Ok(rules)
    }

    /// Parses a single expression that must span the whole source.
    ///
    /// # Errors
    /// Returns a parse error if the source is not exactly one expression.
    pub fn parse_standalone_expression(&mut self) -> Result<Expression> {
        let expr = self.parse_expression()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    /// Parses `rule Name "desc" salience N { when <expr> then <stmts> }`.
    fn parse_rule(&mut self) -> Result<RuleDefinition> {
        let start = self.current.span;
        self.expect(&TokenKind::Rule)?;
        let name = self.expect_ident()?;

        let description = if let TokenKind::String(text) = &self.current.kind {
            let text = text.clone();
            self.advance();
            text
        } else {
            String::new()
        };

        let salience = if self.current.kind == TokenKind::Salience {
            self.advance();
            self.parse_salience()?
        } else {
            0
        };

        self.expect(&TokenKind::LBrace)?;
        self.expect(&TokenKind::When)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Then)?;

        let mut actions = Vec::new();
        loop {
            if self.current.kind == TokenKind::RBrace && !actions.is_empty() {
                break;
            }
            actions.push(self.parse_statement()?);
            if self.current.kind == TokenKind::Semicolon {
                self.advance();
            } else if self.current.kind != TokenKind::RBrace {
                return Err(self.unexpected("';'"));
            }
        }
        let end = self.current.span;
        self.expect(&TokenKind::RBrace)?;

        Ok(RuleDefinition {
            name,
            description,
            salience,
            condition,
            actions,
            span: start.to(end),
        })
    }

    /// Parses an optionally negative integer salience.
    fn parse_salience(&mut self) -> Result<i64> {
        let negative = if self.current.kind == TokenKind::Minus {
            self.advance();
            true
        } else {
            false
        };
        match self.current.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(if negative { -n } else { n })
            }
            _ => Err(self.unexpected("integer salience")),
        }
    }

    /// Parses an assignment or a call statement.
    fn parse_statement(&mut self) -> Result<Statement> {
        let start = self.current.span;
        let expr = self.parse_expression()?;

        if self.current.kind.is_assignment() {
            let op = match self.current.kind {
                TokenKind::PlusAssign => AssignOp::AddAssign,
                TokenKind::MinusAssign => AssignOp::SubAssign,
                TokenKind::StarAssign => AssignOp::MulAssign,
                TokenKind::SlashAssign => AssignOp::DivAssign,
                _ => AssignOp::Assign,
            };
            let Expression::Variable(target) = expr else {
                return Err(self.error_at(start, &format!("cannot assign to {expr}")));
            };
            self.advance();
            let value = self.parse_expression()?;
            return Ok(Statement::Assignment {
                target,
                op,
                span: start.to(self.previous),
                value,
            });
        }

        if !expr.is_call() {
            return Err(self.error_at(
                start,
                &format!("expression statement must be a call or assignment, found {expr}"),
            ));
        }
        Ok(Statement::Expression(expr))
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_binary(1)
    }

    /// Precedence climbing over left-associative binary operators.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.binary_op() {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let right = self.parse_binary(op.precedence() + 1)?;
            let span = left.span().to(right.span());
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// Maps the current token to a binary operator.
    fn binary_op(&self) -> Option<BinaryOp> {
        let op = match self.current.kind {
            TokenKind::OrOr => BinaryOp::Or,
            TokenKind::AndAnd => BinaryOp::And,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            _ => return None,
        };
        Some(op)
    }

    /// Parses prefix operators.
    fn parse_unary(&mut self) -> Result<Expression> {
        let op = match self.current.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        let start = self.current.span;
        self.advance();
        let operand = self.parse_unary()?;
        let span = start.to(operand.span());
        Ok(Expression::Unary {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    /// Parses member accesses and method calls after a primary expression.
    fn parse_postfix(&mut self) -> Result<Expression> {
        let mut expr = self.parse_primary()?;
        while self.current.kind == TokenKind::Dot {
            self.advance();
            let member = self.expect_ident()?;
            if self.current.kind == TokenKind::LParen {
                let args = self.parse_args()?;
                let span = expr.span().to(self.previous);
                expr = Expression::MethodCall {
                    receiver: Box::new(expr),
                    method: member,
                    args,
                    span,
                };
            } else {
                expr = match expr {
                    Expression::Variable(mut path) => {
                        path.span = path.span.to(self.previous);
                        path.accessors.push(member);
                        Expression::Variable(path)
                    }
                    other => {
                        let span = other.span().to(self.previous);
                        Expression::FieldAccess {
                            receiver: Box::new(other),
                            field: member,
                            span,
                        }
                    }
                };
            }
        }
        Ok(expr)
    }

    /// Parses literals, identifiers, function calls, and parentheses.
    fn parse_primary(&mut self) -> Result<Expression> {
        let span = self.current.span;
        let literal = match &self.current.kind {
            TokenKind::Nil => Literal::Nil,
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Int(n) => Literal::Int(*n),
            TokenKind::Float(n) => Literal::Float(*n),
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                if self.current.kind == TokenKind::LParen {
                    let args = self.parse_args()?;
                    return Ok(Expression::BuiltinCall {
                        name,
                        args,
                        span: span.to(self.previous),
                    });
                }
                return Ok(Expression::Variable(VariablePath::new(name, span)));
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::Error(msg) => {
                let msg = msg.clone();
                return Err(self.error(&msg));
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(Expression::Literal(literal, span))
    }

    /// Parses a parenthesized, comma-separated argument list.
    fn parse_args(&mut self) -> Result<Vec<Expression>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.current.kind != TokenKind::RParen {
            loop {
                args.push(self.parse_expression()?);
                if self.current.kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    /// Skips comment tokens.
    fn skip_trivia(&mut self) {
        while self.current.kind.is_trivia() {
            self.current = self.lexer.next_token();
        }
    }

    /// Advances to the next significant token.
    fn advance(&mut self) {
        self.previous = self.current.span;
        self.current = self.lexer.next_token();
        self.skip_trivia();
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        let matches =
            std::mem::discriminant(&self.current.kind) == std::mem::discriminant(expected);

        if matches {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected.name()))
        }
    }

    /// Expects an identifier and returns its text.
    fn expect_ident(&mut self) -> Result<String> {
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Creates an "expected X, found Y" error at the current token.
    fn unexpected(&self, expected: &str) -> Error {
        match &self.current.kind {
            TokenKind::Error(msg) => self.error(msg),
            found => self.error(&format!("expected {expected}, found {}", found.name())),
        }
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::new(ErrorKind::ParseError {
            message: message.to_string(),
            line: span.line,
            column: span.column,
            context: span.line_text(self.source).to_string(),
        })
    }
}

/// Parses rule source into rule definitions.
///
/// # Errors
/// Returns an error if the source cannot be parsed.
pub fn parse(source: &str) -> Result<Vec<RuleDefinition>> {
    Parser::new(source).parse_rules()
}

/// Parses a single expression from source.
///
/// # Errors
/// Returns an error if the source is not exactly one expression.
pub fn parse_expression(source: &str) -> Result<Expression> {
    Parser::new(source).parse_standalone_expression()
}
