#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use mol_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    lex(source, &interner)
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect()
}

fn lex_err(source: &str) -> LexError {
    let interner = StringInterner::new();
    lex(source, &interner).unwrap_err()
}

#[test]
fn test_lex_let_statement() {
    let interner = StringInterner::new();
    let tokens = lex("let x be 42", &interner).unwrap();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0].kind, TokenKind::Let);
    assert_eq!(tokens[1].kind, TokenKind::Ident(interner.intern("x")));
    assert_eq!(tokens[2].kind, TokenKind::Be);
    assert_eq!(tokens[3].kind.as_number(), Some(42.0));
    assert_eq!(tokens[4].kind, TokenKind::Eof);
    assert_eq!(tokens[3].span, Span::new(9, 11));
}

#[test]
fn test_numbers_have_no_int_float_split() {
    let got = kinds("42 2.5 1e3");
    assert_eq!(got[0].as_number(), Some(42.0));
    assert_eq!(got[1].as_number(), Some(2.5));
    assert_eq!(got[2].as_number(), Some(1000.0));
}

#[test]
fn test_multi_char_operators_are_greedy() {
    assert_eq!(
        kinds("|> == != >= <= -> ?? ... |"),
        vec![
            TokenKind::PipeArrow,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::GtEq,
            TokenKind::LtEq,
            TokenKind::Arrow,
            TokenKind::DoubleQuestion,
            TokenKind::DotDotDot,
            TokenKind::Bar,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_is_not_fuses() {
    let interner = StringInterner::new();
    let tokens = lex("a is not b", &interner).unwrap();
    assert_eq!(tokens[1].kind, TokenKind::IsNot);
    assert_eq!(tokens[1].span, Span::new(2, 8));
    assert_eq!(tokens[2].kind, TokenKind::Ident(interner.intern("b")));
}

#[test]
fn test_keywords_are_case_sensitive() {
    let interner = StringInterner::new();
    let tokens = lex("Let show", &interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident(interner.intern("Let")));
    assert_eq!(tokens[1].kind, TokenKind::Show);
}

#[test]
fn test_comment_at_line_start_is_skipped() {
    assert_eq!(
        kinds("-- a comment\nshow 1"),
        vec![TokenKind::Show, TokenKind::number(1.0), TokenKind::Eof]
    );
}

#[test]
fn test_comment_after_whitespace_is_skipped() {
    assert_eq!(
        kinds("show 1 -- trailing"),
        vec![TokenKind::Show, TokenKind::number(1.0), TokenKind::Eof]
    );
}

#[test]
fn test_glued_double_minus_is_two_minus_signs() {
    assert_eq!(
        kinds("5--3"),
        vec![
            TokenKind::number(5.0),
            TokenKind::Minus,
            TokenKind::Minus,
            TokenKind::number(3.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comment_sets_flag_on_next_token() {
    let interner = StringInterner::new();
    let tokens = lex("-- note\nshow 1", &interner).unwrap();
    assert!(tokens[0].flags.contains(TokenFlags::COMMENT_BEFORE));
    assert!(tokens[0].flags.has_newline_before());
    assert!(!tokens[1].flags.contains(TokenFlags::COMMENT_BEFORE));
}

#[test]
fn test_newline_flag() {
    let interner = StringInterner::new();
    let tokens = lex("f\n(1)", &interner).unwrap();
    assert!(tokens[1].flags.has_newline_before());
    let tokens = lex("f(1)", &interner).unwrap();
    assert!(!tokens[1].flags.has_newline_before());
    assert!(!tokens[1].flags.contains(TokenFlags::SPACE_BEFORE));
}

#[test]
fn test_string_escapes() {
    let interner = StringInterner::new();
    let tokens = lex(r#""hello\nworld \"q\"""#, &interner).unwrap();
    let TokenKind::String(name) = tokens[0].kind else {
        panic!("expected string token, got {:?}", tokens[0].kind);
    };
    assert_eq!(interner.lookup(name), "hello\nworld \"q\"");
}

#[test]
fn test_fstring_keeps_raw_body() {
    let interner = StringInterner::new();
    let tokens = lex(r#"f"Hi {name}!""#, &interner).unwrap();
    let TokenKind::FString(body) = tokens[0].kind else {
        panic!("expected f-string token, got {:?}", tokens[0].kind);
    };
    assert_eq!(interner.lookup(body), "Hi {name}!");
}

#[test]
fn test_f_alone_is_an_identifier() {
    let interner = StringInterner::new();
    let tokens = lex("f(x)", &interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident(interner.intern("f")));
}

#[test]
fn test_unterminated_string() {
    let err = lex_err("show \"oops\nshow 2");
    assert_eq!(err.code, ErrorCode::E0001);
    assert_eq!(err.span.start, 5);
}

#[test]
fn test_unrecognized_character() {
    let err = lex_err("let x be 5 @ 2");
    assert_eq!(err.code, ErrorCode::E0002);
    assert_eq!(err.span, Span::new(11, 12));
    assert!(err.message.contains('@'));
}

#[test]
fn test_invalid_number() {
    let err = lex_err("let x be 12abc");
    assert_eq!(err.code, ErrorCode::E0003);
    assert!(err.message.contains("12abc"));
}

#[test]
fn test_invalid_escape() {
    let err = lex_err(r#"show "a\qb""#);
    assert_eq!(err.code, ErrorCode::E0005);
}

#[test]
fn test_unterminated_interpolation() {
    let err = lex_err(r#"show f"x {y""#);
    assert_eq!(err.code, ErrorCode::E0006);
}

#[test]
fn test_eof_span_is_source_end() {
    let interner = StringInterner::new();
    let tokens = lex("show 1\n", &interner).unwrap();
    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span, Span::point(7));
}

#[test]
fn test_error_converts_to_diagnostic() {
    let diag = lex_err("show \"open").to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E0001);
    assert_eq!(diag.primary_span(), Some(Span::new(5, 10)));
}

proptest! {
    #[test]
    fn lexing_arbitrary_input_never_panics(source in "\\PC{0,64}") {
        let interner = StringInterner::new();
        let _ = lex(&source, &interner);
    }

    #[test]
    fn integer_literals_round_trip(n in 0u32..1_000_000) {
        let interner = StringInterner::new();
        let tokens = lex(&n.to_string(), &interner).unwrap();
        prop_assert_eq!(tokens[0].kind.as_number(), Some(f64::from(n)));
    }

    #[test]
    fn token_spans_are_ordered(source in "[a-z0-9 +*()\\-\n]{0,48}") {
        let interner = StringInterner::new();
        if let Ok(tokens) = lex(&source, &interner) {
            let mut prev = 0;
            for token in &tokens {
                prop_assert!(token.span.start >= prev);
                prop_assert!(token.span.end >= token.span.start);
                prev = token.span.end;
            }
        }
    }
}
