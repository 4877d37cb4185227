use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E6001)
        .with_message("division by zero")
        .with_label(Span::new(5, 11), "divisor is zero")
        .with_note("numbers divide as floats")
        .with_suggestion("guard the divisor first");

    assert_eq!(diag.code, ErrorCode::E6001);
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 1);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
    assert_eq!(diag.primary_span(), Some(Span::new(5, 11)));
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::E1002).with_message("expected expression");
    assert_eq!(diag.to_string(), "error[E1002]: expected expression");
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E6099);
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}
