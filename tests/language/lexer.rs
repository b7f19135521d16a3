//! Integration tests for the GRL lexer

use gavel_language::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !matches!(k, TokenKind::Comment(_)))
        .collect()
}

#[test]
fn rule_header_tokens() {
    assert_eq!(
        kinds(r#"rule CheckValues "desc" salience 10 {"#),
        [
            TokenKind::Rule,
            TokenKind::Ident("CheckValues".into()),
            TokenKind::String("desc".into()),
            TokenKind::Salience,
            TokenKind::Int(10),
            TokenKind::LBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(
        kinds("RULE When THEN"),
        [TokenKind::Rule, TokenKind::When, TokenKind::Then, TokenKind::Eof]
    );
}

#[test]
fn comments_are_skippable() {
    let tokens = kinds("a // line\n/* block */ b");
    assert_eq!(
        tokens,
        [
            TokenKind::Ident("a".into()),
            TokenKind::Ident("b".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_track_lines() {
    let tokens = Lexer::tokenize_all("rule\n  X");
    assert_eq!(tokens[1].span.line, 2);
    assert_eq!(tokens[1].span.column, 3);
}
