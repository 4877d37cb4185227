//! Interpolated strings.
//!
//! The lexer keeps an f-string's body raw. Here it is split into literal text
//! and holes, and each hole is lexed and parsed as a full expression with its
//! spans moved back to their place in the original source.

use mol_ir::ast::{Expr, FStringPart};
use mol_ir::{Name, Span, Token, TokenList};
use mol_lexer::{split_fstring, FStringPiece};

use crate::{ParseError, Parser};

/// Bytes of `f"` before the body.
const PREFIX_LEN: u32 = 2;

impl Parser<'_> {
    pub(crate) fn parse_fstring(
        &self,
        body: Name,
        token_span: Span,
    ) -> Result<Vec<FStringPart>, ParseError> {
        let text = self.interner().lookup(body);
        let body_start = token_span.start + PREFIX_LEN;
        let pieces = split_fstring(text, body_start).map_err(|e| {
            let span = e.span;
            ParseError::in_interpolation(e, span)
        })?;

        let mut parts = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece {
                FStringPiece::Literal(literal) => parts.push(FStringPart::Literal(literal)),
                FStringPiece::Hole { source, offset } => {
                    parts.push(FStringPart::Expr(self.parse_hole(source, offset)?));
                }
            }
        }
        Ok(parts)
    }

    fn parse_hole(&self, source: &str, offset: u32) -> Result<Expr, ParseError> {
        let interner = self.interner();
        let local = mol_lexer::lex(source, interner).map_err(|e| {
            let span = e.span.shifted(offset);
            ParseError::in_interpolation(e, span)
        })?;

        let mut tokens = TokenList::new();
        for token in &local {
            tokens.push(Token {
                span: token.span.shifted(offset),
                ..*token
            });
        }

        let mut parser = Parser::new(&tokens, interner);
        let expr = parser.parse_expr().map_err(|e| {
            let span = e.span;
            ParseError::in_interpolation(e, span)
        })?;
        if !parser.is_at_end() {
            return Err(ParseError::in_interpolation(
                format!(
                    "unexpected {} after expression",
                    parser.current_kind().display_name()
                ),
                parser.current_span(),
            ));
        }
        Ok(expr)
    }
}
