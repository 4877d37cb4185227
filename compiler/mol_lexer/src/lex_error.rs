//! Lexer errors.

use std::fmt;

use mol_diagnostic::{Diagnostic, ErrorCode};
use mol_ir::Span;

/// A lexical error. Lexing stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl LexError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        LexError {
            code,
            message: message.into(),
            span,
        }
    }

    #[cold]
    pub fn unterminated_string(span: Span) -> Self {
        Self::new(ErrorCode::E0001, "unterminated string literal", span)
    }

    #[cold]
    pub fn unrecognized_char(c: char, span: Span) -> Self {
        Self::new(
            ErrorCode::E0002,
            format!("unrecognized character {c:?}"),
            span,
        )
    }

    #[cold]
    pub fn invalid_number(text: &str, span: Span) -> Self {
        Self::new(
            ErrorCode::E0003,
            format!("invalid number literal `{text}`"),
            span,
        )
    }

    #[cold]
    pub fn invalid_escape(sequence: &str, span: Span) -> Self {
        Self::new(
            ErrorCode::E0005,
            format!("invalid escape sequence `{sequence}`"),
            span,
        )
    }

    #[cold]
    pub fn unterminated_interpolation(span: Span) -> Self {
        Self::new(
            ErrorCode::E0006,
            "unterminated interpolation: `{` has no matching `}`",
            span,
        )
    }

    #[cold]
    pub fn source_too_large(len: usize) -> Self {
        Self::new(
            ErrorCode::E0002,
            format!("source is {len} bytes; at most {} are supported", u32::MAX),
            Span::DUMMY,
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.code {
            ErrorCode::E0001 => "string starts here",
            ErrorCode::E0003 => "not a number",
            ErrorCode::E0005 => "unknown escape",
            ErrorCode::E0006 => "interpolation starts here",
            _ => "here",
        };
        let diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, label);
        match self.code {
            ErrorCode::E0005 => {
                diag.with_note("supported escapes: \\n \\t \\r \\\\ \\\" \\{ \\}")
            }
            ErrorCode::E0001 => diag.with_suggestion("close the string with `\"` on the same line"),
            _ => diag,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LexError {}
