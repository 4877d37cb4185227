//! Lexer for MOL using logos with string interning.
//!
//! [`lex`] turns source text into a [`TokenList`] ending in `Eof`. Layout is
//! not significant in MOL, but the parser needs to know whether a `(` or `[`
//! started a new line, so each token records what trivia preceded it in its
//! [`TokenFlags`].

mod convert;
mod escape;
mod fstring;
mod lex_error;
mod raw_token;

use logos::Logos;
use mol_ir::{Span, StringInterner, Token, TokenFlags, TokenKind, TokenList};

use convert::convert_token;
use escape::offset;
use raw_token::RawToken;

pub use fstring::{split_fstring, FStringPiece};
pub use lex_error::LexError;

/// Lex source code into a `TokenList`.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    if u32::try_from(source.len()).is_err() {
        return Err(LexError::source_too_large(source.len()));
    }
    let mut lexer = Lexer::new(source, interner);
    lexer.run()?;
    tracing::debug!(tokens = lexer.tokens.len(), bytes = source.len(), "lexed");
    Ok(lexer.tokens)
}

struct Lexer<'src, 'i> {
    source: &'src str,
    interner: &'i StringInterner,
    tokens: TokenList,
    /// End of the last pushed token.
    prev_end: usize,
    comment_pending: bool,
}

impl<'src, 'i> Lexer<'src, 'i> {
    fn new(source: &'src str, interner: &'i StringInterner) -> Self {
        Lexer {
            source,
            interner,
            tokens: TokenList::new(),
            prev_end: 0,
            comment_pending: false,
        }
    }

    fn run(&mut self) -> Result<(), LexError> {
        // logos is restarted whenever a `--` turns out to be two minus signs.
        let source = self.source;
        let mut base = 0;
        'restart: loop {
            let mut raw_lexer = RawToken::lexer(&source[base..]);
            while let Some(result) = raw_lexer.next() {
                let range = raw_lexer.span();
                let start = base + range.start;
                let end = base + range.end;
                let slice = raw_lexer.slice();

                match result {
                    Ok(RawToken::Comment) => {
                        if self.comment_allowed_at(start) {
                            self.comment_pending = true;
                        } else {
                            self.push(TokenKind::Minus, start, start + 1);
                            base = start + 1;
                            continue 'restart;
                        }
                    }
                    Ok(RawToken::Number(value)) => {
                        self.check_number_suffix(start, end)?;
                        self.push(TokenKind::number(value), start, end);
                    }
                    Ok(raw) => {
                        let kind = convert_token(raw, slice, span(start, end), self.interner)?;
                        self.push(kind, start, end);
                    }
                    Err(()) => {
                        let c = slice.chars().next().unwrap_or('\u{fffd}');
                        return Err(LexError::unrecognized_char(c, span(start, end)));
                    }
                }
            }
            break;
        }

        let eof = Token::new(TokenKind::Eof, Span::point(offset(self.source.len())))
            .with_flags(self.flags_before(self.source.len()));
        self.tokens.push(eof);
        Ok(())
    }

    /// `--` starts a comment at the start of input or after whitespace.
    fn comment_allowed_at(&self, start: usize) -> bool {
        self.source[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace)
    }

    /// A number glued to identifier characters (`12abc`, `3e`) is malformed.
    fn check_number_suffix(&self, start: usize, end: usize) -> Result<(), LexError> {
        let rest = &self.source[end..];
        let suffix_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if suffix_len == 0 {
            return Ok(());
        }
        let stop = end + suffix_len;
        Err(LexError::invalid_number(
            &self.source[start..stop],
            span(start, stop),
        ))
    }

    fn flags_before(&mut self, start: usize) -> TokenFlags {
        let gap = &self.source[self.prev_end.min(start)..start];
        let mut flags = TokenFlags::empty();
        if gap.contains('\n') {
            flags |= TokenFlags::NEWLINE_BEFORE;
        }
        if gap.contains([' ', '\t']) {
            flags |= TokenFlags::SPACE_BEFORE;
        }
        if std::mem::take(&mut self.comment_pending) {
            flags |= TokenFlags::COMMENT_BEFORE;
        }
        flags
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let flags = self.flags_before(start);
        self.prev_end = end;

        // `is not` is a single operator.
        if kind == TokenKind::Not {
            if let Some(last) = self.tokens.last_mut() {
                if last.kind == TokenKind::Is {
                    last.kind = TokenKind::IsNot;
                    last.span = last.span.merge(span(start, end));
                    return;
                }
            }
        }
        self.tokens
            .push(Token::new(kind, span(start, end)).with_flags(flags));
    }
}

#[inline]
fn span(start: usize, end: usize) -> Span {
    Span::new(offset(start), offset(end))
}

#[cfg(test)]
mod tests;
