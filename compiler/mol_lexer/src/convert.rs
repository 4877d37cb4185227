//! Raw token to `TokenKind` conversion.

use mol_ir::{Span, StringInterner, TokenKind};

use crate::escape::unescape_string;
use crate::fstring::split_fstring;
use crate::raw_token::RawToken;
use crate::LexError;

/// Convert a raw token to a `TokenKind`, interning identifiers and string
/// contents.
///
/// Comments never reach this point; the lexer loop decides whether a `--`
/// run is a comment or a pair of minus signs.
pub(crate) fn convert_token(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
) -> Result<TokenKind, LexError> {
    let kind = match raw {
        RawToken::Number(value) => TokenKind::number(value),
        RawToken::String => {
            let content = &slice[1..slice.len() - 1];
            let text = unescape_string(content, span.start + 1)?;
            TokenKind::String(interner.intern(&text))
        }
        RawToken::FString => {
            let content = &slice[2..slice.len() - 1];
            split_fstring(content, span.start + 2)?;
            TokenKind::FString(interner.intern(content))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::Let => TokenKind::Let,
        RawToken::Be => TokenKind::Be,
        RawToken::Set => TokenKind::Set,
        RawToken::To => TokenKind::To,
        RawToken::Show => TokenKind::Show,
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::End => TokenKind::End,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::Define => TokenKind::Define,
        RawToken::Pipeline => TokenKind::Pipeline,
        RawToken::Return => TokenKind::Return,
        RawToken::Guard => TokenKind::Guard,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::Is => TokenKind::Is,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Try => TokenKind::Try,
        RawToken::Rescue => TokenKind::Rescue,
        RawToken::Ensure => TokenKind::Ensure,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Match => TokenKind::Match,
        RawToken::With => TokenKind::With,
        RawToken::When => TokenKind::When,
        RawToken::Begin => TokenKind::Begin,

        RawToken::Listen => TokenKind::Listen,
        RawToken::Trigger => TokenKind::Trigger,
        RawToken::Link => TokenKind::Link,
        RawToken::Process => TokenKind::Process,
        RawToken::Access => TokenKind::Access,
        RawToken::Sync => TokenKind::Sync,
        RawToken::Evolve => TokenKind::Evolve,
        RawToken::Emit => TokenKind::Emit,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::DotDotDot => TokenKind::DotDotDot,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::PipeArrow => TokenKind::PipeArrow,
        RawToken::Bar => TokenKind::Bar,
        RawToken::DoubleQuestion => TokenKind::DoubleQuestion,

        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,

        RawToken::UnterminatedString | RawToken::UnterminatedFString => {
            return Err(LexError::unterminated_string(span));
        }
        RawToken::Comment => unreachable!("comments are consumed by the lexer loop"),
    };
    Ok(kind)
}
