//! Token types for GRL.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types for GRL.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords (matched case-insensitively)
    /// `rule`
    Rule,
    /// `salience`
    Salience,
    /// `when`
    When,
    /// `then`
    Then,
    /// `nil`
    Nil,
    /// `true`
    True,
    /// `false`
    False,

    // Literals
    /// Integer literal like `42`
    Int(i64),
    /// Float literal like `3.14` or `1e3`
    Float(f64),
    /// String literal like `"hello"`
    String(String),
    /// Identifier like `MF` or `IntAttribute`
    Ident(String),

    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// `==`
    EqEq,
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
    AndAnd,
    /// `||`
    OrOr,
    /// `=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    StarAssign,
    /// `/=`
    SlashAssign,

    // Meta
    /// Line or block comment, including its delimiters
    Comment(String),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Returns true if this token starts an assignment statement.
    #[must_use]
    pub const fn is_assignment(&self) -> bool {
        matches!(
            self,
            Self::Assign | Self::PlusAssign | Self::MinusAssign | Self::StarAssign | Self::SlashAssign
        )
    }

    /// Looks up a keyword, ignoring ASCII case.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "rule" => Self::Rule,
            "salience" => Self::Salience,
            "when" => Self::When,
            "then" => Self::Then,
            "nil" => Self::Nil,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rule => "'rule'",
            Self::Salience => "'salience'",
            Self::When => "'when'",
            Self::Then => "'then'",
            Self::Nil => "nil",
            Self::True => "true",
            Self::False => "false",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Ident(_) => "identifier",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Bang => "'!'",
            Self::EqEq => "'=='",
            Self::NotEq => "'!='",
            Self::Lt => "'<'",
            Self::Le => "'<='",
            Self::Gt => "'>'",
            Self::Ge => "'>='",
            Self::AndAnd => "'&&'",
            Self::OrOr => "'||'",
            Self::Assign => "'='",
            Self::PlusAssign => "'+='",
            Self::MinusAssign => "'-='",
            Self::StarAssign => "'*='",
            Self::SlashAssign => "'/='",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
