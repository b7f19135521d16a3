//! Lexer for GRL.
//!
//! The lexer converts rule source text into a stream of tokens.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for GRL source code.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '%' => self.single(TokenKind::Percent),
            '.' if !self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.single(TokenKind::Dot)
            }
            '+' => self.with_eq(TokenKind::Plus, TokenKind::PlusAssign),
            '-' => self.with_eq(TokenKind::Minus, TokenKind::MinusAssign),
            '*' => self.with_eq(TokenKind::Star, TokenKind::StarAssign),
            '/' => match self.peek_char_n(1) {
                Some('/') => self.scan_line_comment(),
                Some('*') => self.scan_block_comment(),
                _ => self.with_eq(TokenKind::Slash, TokenKind::SlashAssign),
            },
            '!' => self.with_eq(TokenKind::Bang, TokenKind::NotEq),
            '=' => self.with_eq(TokenKind::Assign, TokenKind::EqEq),
            '<' => self.with_eq(TokenKind::Lt, TokenKind::Le),
            '>' => self.with_eq(TokenKind::Gt, TokenKind::Ge),
            '&' => self.doubled('&', TokenKind::AndAnd),
            '|' => self.doubled('|', TokenKind::OrOr),
            '"' => self.scan_string(),
            c if c.is_ascii_digit() || c == '.' => self.scan_number(),
            c if is_ident_start(c) => self.scan_ident(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks `n` characters ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Consumes one character, plus a following `=` if present.
    fn with_eq(&mut self, plain: TokenKind, with_eq: TokenKind) -> TokenKind {
        self.advance();
        if self.peek_char() == Some('=') {
            self.advance();
            with_eq
        } else {
            plain
        }
    }

    /// Consumes a doubled operator such as `&&`.
    fn doubled(&mut self, c: char, kind: TokenKind) -> TokenKind {
        self.advance();
        if self.peek_char() == Some(c) {
            self.advance();
            kind
        } else {
            TokenKind::Error(format!("expected '{c}{c}'"))
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a `//` comment up to the end of the line.
    fn scan_line_comment(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.position].to_string())
    }

    /// Scans a `/* ... */` comment.
    fn scan_block_comment(&mut self) -> TokenKind {
        let start = self.position;
        self.advance();
        self.advance();
        loop {
            match self.peek_char() {
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return TokenKind::Comment(self.source[start..self.position].to_string());
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated block comment".into()),
            }
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening '"'
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(c) => {
                            return TokenKind::Error(format!("invalid escape sequence: \\{c}"));
                        }
                        None => {
                            return TokenKind::Error(
                                "unexpected end of input in string escape".into(),
                            );
                        }
                    };
                    self.advance();
                    text.push(escaped);
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => {
                    return TokenKind::Error("unterminated string literal".into());
                }
            }
        }
        TokenKind::String(text)
    }

    /// Scans a number (integer or float, optional exponent).
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        let mut is_float = false;

        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_char_n(1), Some('+' | '-')));
            if self.peek_char_n(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..=sign {
                    self.advance();
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text = &self.source[start..self.position];

        if is_float {
            match text.parse::<f64>() {
                Ok(n) => TokenKind::Float(n),
                Err(e) => TokenKind::Error(format!("invalid float: {e}")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => TokenKind::Int(n),
                Err(e) => TokenKind::Error(format!("invalid integer: {e}")),
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_ident(&mut self) -> TokenKind {
        let start = self.position;
        while self.peek_char().is_some_and(is_ident_char) {
            self.advance();
        }
        let word = &self.source[start..self.position];
        TokenKind::keyword(word).unwrap_or_else(|| TokenKind::Ident(word.to_string()))
    }
}

/// Returns true if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Returns true if `c` can appear in an identifier (not at start).
fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
