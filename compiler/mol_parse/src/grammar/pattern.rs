//! Match patterns.

use mol_diagnostic::ErrorCode;
use mol_ir::ast::{Pattern, PatternKind};
use mol_ir::TokenKind;
use mol_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        ensure_sufficient_stack(|| self.parse_pattern_inner())
    }

    fn parse_pattern_inner(&mut self) -> Result<Pattern, ParseError> {
        let start = self.current_span();
        let current = self.current_kind();
        let kind = match current {
            TokenKind::Ident(name) => {
                self.advance();
                if self.interner().lookup(name) == "_" {
                    PatternKind::Wildcard
                } else {
                    PatternKind::Binding(name)
                }
            }
            TokenKind::Number(_) => {
                self.advance();
                PatternKind::Number(current.as_number().unwrap_or_default())
            }
            TokenKind::Minus => {
                self.advance();
                let Some(value) = self.current_kind().as_number() else {
                    return Err(self.expected_pattern());
                };
                self.advance();
                PatternKind::Number(-value)
            }
            TokenKind::String(text) => {
                self.advance();
                PatternKind::Text(self.interner().lookup(text).to_string())
            }
            TokenKind::True => {
                self.advance();
                PatternKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                PatternKind::Bool(false)
            }
            TokenKind::Null => {
                self.advance();
                PatternKind::Null
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                let mut rest = None;
                while !self.check(TokenKind::RBracket) {
                    if self.eat(TokenKind::DotDotDot) {
                        rest = Some(self.expect_ident()?);
                        break;
                    }
                    items.push(self.parse_pattern()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket)?;
                PatternKind::List { items, rest }
            }
            _ => return Err(self.expected_pattern()),
        };
        Ok(Pattern {
            kind,
            span: start.merge(self.previous_span()),
        })
    }

    #[cold]
    #[inline(never)]
    fn expected_pattern(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected pattern, found {}",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context("expected `_`, a literal, a name or a list pattern")
    }
}
