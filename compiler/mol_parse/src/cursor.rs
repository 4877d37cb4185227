//! Token cursor for navigating the token stream.

use mol_diagnostic::ErrorCode;
use mol_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};
use tracing::trace;

use crate::ParseError;

/// Position in a token stream plus the interner used to resolve names.
///
/// Invariant: the stream ends with `Eof` and the cursor never moves past it.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens,
            interner,
            pos: 0,
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].span,
            None => Span::DUMMY,
        }
    }

    /// Kind of the token `n` positions ahead; `Eof` past the end.
    pub fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Check the current token against a payload-free kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    /// True if a newline separates the current token from the previous one.
    #[inline]
    pub fn has_newline_before(&self) -> bool {
        self.current().flags.has_newline_before()
    }

    /// Advance to the next token and return the consumed token.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        trace!(
            pos = self.pos,
            kind = %token.kind.display_name(),
            span_start = token.span.start,
            span_end = token.span.end,
            "advance"
        );
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_error(&self, kind: TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {}, found {}",
                kind.display_name(),
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {}", kind.display_name()))
    }

    /// Consume an identifier and return its name.
    #[inline]
    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(self.make_expect_ident_error("identifier"))
        }
    }

    /// Consume an identifier or a keyword used as a plain name, as after `.`
    /// or as a map key.
    pub fn expect_ident_or_keyword(&mut self) -> Result<Name, ParseError> {
        let kind = self.current_kind();
        if let TokenKind::Ident(name) = kind {
            self.advance();
            return Ok(name);
        }
        if let Some(text) = kind.keyword_text() {
            self.advance();
            return Ok(self.interner.intern(text));
        }
        Err(self.make_expect_ident_error("name"))
    }

    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self, what: &str) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {what}, found {}",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {what}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mol_ir::TokenFlags;

    fn tokens(kinds: &[TokenKind]) -> TokenList {
        let mut list = TokenList::new();
        for (i, kind) in kinds.iter().enumerate() {
            let start = u32::try_from(i).unwrap_or(0) * 2;
            list.push(Token::new(*kind, Span::new(start, start + 1)));
        }
        list.push(Token::new(TokenKind::Eof, Span::point(100)).with_flags(TokenFlags::empty()));
        list
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let interner = StringInterner::new();
        let list = tokens(&[TokenKind::Show]);
        let mut cursor = Cursor::new(&list, &interner);
        assert_eq!(cursor.advance().kind, TokenKind::Show);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_expect_error_message() {
        let interner = StringInterner::new();
        let list = tokens(&[TokenKind::Do]);
        let mut cursor = Cursor::new(&list, &interner);
        let err = cursor.expect(TokenKind::Then).err();
        let err = err.map(|e| e.message);
        assert_eq!(err.as_deref(), Some("expected `then`, found `do`"));
    }

    #[test]
    fn test_keyword_as_name() {
        let interner = StringInterner::new();
        let list = tokens(&[TokenKind::Sync]);
        let mut cursor = Cursor::new(&list, &interner);
        let name = cursor.expect_ident_or_keyword().ok();
        assert_eq!(name, Some(interner.intern("sync")));
    }

    #[test]
    fn test_peek_past_end_is_eof() {
        let interner = StringInterner::new();
        let list = tokens(&[TokenKind::Let]);
        let cursor = Cursor::new(&list, &interner);
        assert_eq!(cursor.peek_kind_at(1), TokenKind::Eof);
        assert_eq!(cursor.peek_kind_at(5), TokenKind::Eof);
    }
}
