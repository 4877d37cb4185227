//! Shared front-end data for the MOL interpreter.
//!
//! Everything the lexer, parser and evaluator agree on lives here:
//! - [`Span`] and [`LineIndex`] for source positions
//! - [`Name`] and [`StringInterner`] for identifiers
//! - [`Token`], [`TokenKind`] and [`TokenList`] produced by the lexer
//! - the [`ast`] produced by the parser

pub mod ast;
mod interner;
mod line_index;
mod name;
mod span;
mod token;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use line_index::LineIndex;
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenFlags, TokenKind, TokenList};
