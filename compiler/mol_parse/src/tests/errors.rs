use pretty_assertions::assert_eq;

use super::parse_err;
use crate::SyntaxError;
use mol_diagnostic::ErrorCode;
use mol_ir::Span;

#[test]
fn test_unexpected_token_names_both_sides() {
    let err = parse_err("if x do show 1 end");
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(err.to_string(), "SyntaxError: expected `then`, found `do`");
    assert_eq!(err.span(), Span::new(5, 7));
}

#[test]
fn test_missing_expression() {
    let err = parse_err("let x be");
    assert_eq!(err.code(), ErrorCode::E1002);
    assert!(err.to_string().contains("expected expression"));
}

#[test]
fn test_missing_end_reports_opening_keyword() {
    let source = "while true do\n  show 1\n";
    let err = parse_err(source);
    assert_eq!(err.code(), ErrorCode::E1003);
    let SyntaxError::Parse(parse) = &err else {
        panic!("expected a parse error");
    };
    assert_eq!(parse.opened_at, Some(Span::new(0, 5)));
    assert!(parse.message.contains("`while`"));

    let diag = err.to_diagnostic();
    assert_eq!(diag.labels.len(), 2);
}

#[test]
fn test_missing_end_in_nested_function() {
    let err = parse_err("define f(x)\n  if x then\n    return 1\nend");
    assert_eq!(err.code(), ErrorCode::E1003);
    assert!(err.to_string().contains("`define`"));
}

#[test]
fn test_stray_end() {
    let err = parse_err("show 1\nend");
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(err.span(), Span::new(7, 10));
}

#[test]
fn test_invalid_assignment_target() {
    let err = parse_err("set f(1) to 2");
    assert_eq!(err.code(), ErrorCode::E1004);
    assert_eq!(err.span(), Span::new(4, 8));
}

#[test]
fn test_default_before_required_param() {
    let err = parse_err("define f(a be 1, b)\nend");
    assert_eq!(err.code(), ErrorCode::E1001);
}

#[test]
fn test_bad_fstring_hole() {
    let err = parse_err(r#"show f"x {1 +}""#);
    assert_eq!(err.code(), ErrorCode::E1005);
    assert!(err.to_string().contains("malformed f-string expression"));

    let err = parse_err(r#"show f"x {}""#);
    assert_eq!(err.code(), ErrorCode::E1005);

    let err = parse_err(r#"show f"x {a b}""#);
    assert_eq!(err.code(), ErrorCode::E1005);
}

#[test]
fn test_lex_errors_surface_as_syntax_errors() {
    let err = parse_err("show \"unterminated");
    assert!(matches!(err, SyntaxError::Lex(_)));
    assert_eq!(err.code(), ErrorCode::E0001);
}

#[test]
fn test_match_needs_an_arm() {
    let err = parse_err("match x with end");
    assert_eq!(err.code(), ErrorCode::E1001);
    assert!(err.to_string().contains("`|`"));
}
