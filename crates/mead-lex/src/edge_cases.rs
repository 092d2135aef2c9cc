//! Edge case tests for mead-lex

use crate::{Lexer, Token, TokenKind};

fn lex_all(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new();
    assert!(lexer.lex(source), "input should lex completely: {source:?}");
    lexer.tokens
}

// ==================== EDGE CASES ====================

#[test]
fn test_edge_single_char_ident() {
    let t = lex_all("x");
    assert_eq!(t[0].kind, TokenKind::Identifier);
    assert_eq!(t[0].lexeme, "x");
}

#[test]
fn test_edge_long_identifier() {
    let name = "a".repeat(10_000);
    let t = lex_all(&name);
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].lexeme, name);
}

#[test]
fn test_edge_zero_literal_is_octal_rule() {
    let t = lex_all("0");
    assert_eq!(t[0].kind, TokenKind::IntegerLiteral);
    assert_eq!(t[0].lexeme, "0");
}

#[test]
fn test_edge_octal_with_separators() {
    let t = lex_all("0'7'7");
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].kind, TokenKind::IntegerLiteral);
}

#[test]
fn test_edge_adjacent_tokens_without_whitespace() {
    let t = lex_all("foo(bar)[0]");
    let kinds: Vec<_> = t.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::OpeningParen,
            TokenKind::Identifier,
            TokenKind::ClosingParen,
            TokenKind::OpeningSquare,
            TokenKind::IntegerLiteral,
            TokenKind::ClosingSquare,
        ]
    );
}

#[test]
fn test_edge_float_does_not_split() {
    // "1.5" must not lex as Integer Dot Integer: float wins on length.
    let t = lex_all("1.5");
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].kind, TokenKind::FloatLiteral);
}

#[test]
fn test_edge_subscripted_string() {
    let t = lex_all("\"hello\"[42]");
    let kinds: Vec<_> = t.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::StringLiteral,
            TokenKind::OpeningSquare,
            TokenKind::IntegerLiteral,
            TokenKind::ClosingSquare,
        ]
    );
}

#[test]
fn test_edge_empty_string_literal() {
    let t = lex_all("\"\"");
    assert_eq!(t[0].kind, TokenKind::StringLiteral);
    assert_eq!(t[0].lexeme, "\"\"");
}

#[test]
fn test_edge_const_pointer_soup() {
    let t = lex_all("u8 const * const * const");
    let kinds: Vec<_> = t.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::IntegerType,
            TokenKind::Const,
            TokenKind::Star,
            TokenKind::Const,
            TokenKind::Star,
            TokenKind::Const,
        ]
    );
}

#[test]
fn test_edge_crlf_counts_one_line() {
    let mut lexer = Lexer::new();
    assert!(lexer.lex("a\r\nb"));
    assert_eq!(lexer.tokens[1].location.line, 2);
    assert_eq!(lexer.tokens[1].location.column, 1);
}

#[test]
fn test_edge_unterminated_string_fails() {
    let mut lexer = Lexer::new();
    assert!(!lexer.lex("\"oops"));
    assert!(lexer.tokens.is_empty());
}

// ==================== PROPERTIES ====================

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Strategy producing strings that are concatenations of valid lexemes
    /// and whitespace.
    fn token_soup() -> impl Strategy<Value = String> {
        let lexeme = prop_oneof![
            Just("fn".to_string()),
            Just("const".to_string()),
            Just("42".to_string()),
            Just("0x7f".to_string()),
            Just("3.25".to_string()),
            Just("\"str\"".to_string()),
            Just("foo".to_string()),
            Just("i32".to_string()),
            Just("->".to_string()),
            Just("<=>".to_string()),
            Just("::".to_string()),
            Just(";".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
        ];
        let sep = prop_oneof![Just(" "), Just("\n"), Just("\t"), Just("  ")];
        proptest::collection::vec((lexeme, sep), 0..40).prop_map(|pieces| {
            let mut out = String::new();
            for (lexeme, sep) in pieces {
                out.push_str(&lexeme);
                out.push_str(sep);
            }
            out
        })
    }

    proptest! {
        /// Any concatenation of valid lexemes and whitespace lexes fully,
        /// and the emitted lexemes re-concatenate to the input minus
        /// whitespace.
        #[test]
        fn prop_roundtrip(input in token_soup()) {
            let mut lexer = Lexer::new();
            prop_assert!(lexer.lex(&input));

            let rebuilt: String = lexer.tokens.iter().map(|t| t.lexeme.as_str()).collect();
            let stripped: String = input.split_whitespace().collect();
            prop_assert_eq!(rebuilt, stripped);
        }

        /// Lexing is deterministic.
        #[test]
        fn prop_deterministic(input in token_soup()) {
            let mut a = Lexer::new();
            let mut b = Lexer::new();
            prop_assert_eq!(a.lex(&input), b.lex(&input));
            prop_assert_eq!(a.tokens, b.tokens);
        }
    }
}
