//! Parse error types.

use std::fmt;

use mol_diagnostic::{Diagnostic, ErrorCode};
use mol_ir::Span;
use mol_lexer::LexError;

/// A parse error. Parsing stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    /// Location of the offending token.
    pub span: Span,
    /// Label text shown at `span`.
    pub context: Option<String>,
    /// Where the construct being parsed started, for "opened here" labels.
    pub opened_at: Option<Span>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            opened_at: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_opened_at(mut self, span: Span) -> Self {
        self.opened_at = Some(span);
        self
    }

    /// A compound statement ran into end of input before its `end`.
    #[cold]
    pub fn unclosed_block(keyword: &str, opened_at: Span, found_at: Span) -> Self {
        ParseError::new(
            ErrorCode::E1003,
            format!("`{keyword}` block is missing its `end`"),
            found_at,
        )
        .with_context("expected `end` here")
        .with_opened_at(opened_at)
    }

    /// An error inside an f-string hole.
    #[cold]
    pub fn in_interpolation(inner: impl fmt::Display, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1005,
            format!("malformed f-string expression: {inner}"),
            span,
        )
    }

    /// Convert to a full Diagnostic for rich error reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"));
        match self.opened_at {
            Some(opened) => diag.with_secondary_label(opened, "block opened here"),
            None => diag,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// Any failure to turn source text into a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    Lex(LexError),
    Parse(ParseError),
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(e) => e.span,
            SyntaxError::Parse(e) => e.span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SyntaxError::Lex(e) => e.code,
            SyntaxError::Parse(e) => e.code,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SyntaxError::Lex(e) => e.to_diagnostic(),
            SyntaxError::Parse(e) => e.to_diagnostic(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::Lex(e) => write!(f, "SyntaxError: {e}"),
            SyntaxError::Parse(e) => write!(f, "SyntaxError: {e}"),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl From<LexError> for SyntaxError {
    fn from(e: LexError) -> Self {
        SyntaxError::Lex(e)
    }
}

impl From<ParseError> for SyntaxError {
    fn from(e: ParseError) -> Self {
        SyntaxError::Parse(e)
    }
}
