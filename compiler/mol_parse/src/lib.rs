//! Recursive descent parser for MOL.
//!
//! Produces an owned [`ast::Program`](mol_ir::ast::Program). Parsing stops at
//! the first error; a program that fails to parse is never evaluated.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::{ParseError, SyntaxError};

use mol_diagnostic::ErrorCode;
use mol_ir::ast::Program;
use mol_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
        }
    }

    // Cursor delegation.

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        self.cursor.check_any(kinds)
    }

    #[inline]
    fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.cursor.peek_kind_at(n)
    }

    #[inline]
    fn has_newline_before(&self) -> bool {
        self.cursor.has_newline_before()
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<Name, ParseError> {
        self.cursor.expect_ident()
    }

    #[inline]
    fn expect_ident_or_keyword(&mut self) -> Result<Name, ParseError> {
        self.cursor.expect_ident_or_keyword()
    }

    #[inline]
    fn interner(&self) -> &'a StringInterner {
        self.cursor.interner()
    }

    /// Parse a whole program.
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if self.check(TokenKind::End) {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "unexpected `end` with no open block",
                    self.current_span(),
                )
                .with_context("nothing to close here"));
            }
            statements.push(self.parse_stmt()?);
        }
        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }
}

/// Parse a token stream into a program.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<Program, ParseError> {
    Parser::new(tokens, interner).parse_program()
}

/// Lex and parse source text in one step.
pub fn parse_source(source: &str, interner: &StringInterner) -> Result<Program, SyntaxError> {
    let tokens = mol_lexer::lex(source, interner)?;
    Ok(parse(&tokens, interner)?)
}

#[cfg(test)]
mod tests;
