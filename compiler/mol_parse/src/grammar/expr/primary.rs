//! Primary expressions: literals, names, grouping, lists, maps, lambdas and
//! `match`.

use std::rc::Rc;

use mol_diagnostic::ErrorCode;
use mol_ir::ast::{Expr, ExprKind, FunctionBody, FunctionDecl, FunctionKind, MatchArm};
use mol_ir::{Name, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        let kind = self.current_kind();
        let expr_kind = match kind {
            TokenKind::Number(_) => {
                self.advance();
                ExprKind::Number(kind.as_number().unwrap_or_default())
            }
            TokenKind::String(text) => {
                self.advance();
                ExprKind::Text(self.interner().lookup(text).to_string())
            }
            TokenKind::FString(body) => {
                self.advance();
                ExprKind::FString(self.parse_fstring(body, span)?)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Var(name)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                // Grouping keeps the inner node but widens its span.
                return Ok(Expr::new(inner.kind, span.merge(self.previous_span())));
            }
            TokenKind::LBracket => self.parse_list_literal()?,
            TokenKind::LBrace => self.parse_map_literal()?,
            TokenKind::Fn => return self.parse_lambda(),
            TokenKind::Match => return self.parse_match(),
            _ => return Err(self.expected_expression()),
        };
        Ok(Expr::new(expr_kind, span.merge(self.previous_span())))
    }

    #[cold]
    #[inline(never)]
    fn expected_expression(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1002,
            format!(
                "expected expression, found {}",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context("expected an expression here")
    }

    /// `[a, b, c]` with an optional trailing comma.
    fn parse_list_literal(&mut self) -> Result<ExprKind, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut items = Vec::new();
        while !self.check(TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(ExprKind::List(items))
    }

    /// `{key: value, "key": value}`; bare keys may be keywords.
    fn parse_map_literal(&mut self) -> Result<ExprKind, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut entries = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let key = if let TokenKind::String(text) = self.current_kind() {
                self.advance();
                text
            } else {
                self.expect_ident_or_keyword()?
            };
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push((self.interner().lookup(key).to_string(), value));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(ExprKind::Map(entries))
    }

    /// `fn(params) -> body`
    fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        let start = self.advance().span;
        let params = self.parse_params()?;
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expr()?;
        let span = start.merge(body.span);
        let decl = FunctionDecl {
            name: Name::EMPTY,
            kind: FunctionKind::Lambda,
            params,
            body: FunctionBody::Expr(body),
            span,
        };
        Ok(Expr::new(ExprKind::Lambda(Rc::new(decl)), span))
    }

    /// `match subject with | pattern (when guard)? -> body ... end`
    fn parse_match(&mut self) -> Result<Expr, ParseError> {
        let opened_at = self.advance().span;
        let subject = self.parse_expr()?;
        self.expect(TokenKind::With)?;

        let mut arms = Vec::new();
        if !self.check(TokenKind::Bar) {
            // At least one arm.
            self.expect(TokenKind::Bar)?;
        }
        while self.check(TokenKind::Bar) {
            let arm_start = self.advance().span;
            let pattern = self.parse_pattern()?;
            let guard = if self.eat(TokenKind::When) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.expect(TokenKind::Arrow)?;
            let body =
                self.parse_block_until(&[TokenKind::Bar, TokenKind::End], "match", opened_at)?;
            arms.push(MatchArm {
                pattern,
                guard,
                body,
                span: arm_start.merge(self.previous_span()),
            });
        }
        self.expect(TokenKind::End)?;

        let span = opened_at.merge(self.previous_span());
        Ok(Expr::new(
            ExprKind::Match {
                subject: Box::new(subject),
                arms,
            },
            span,
        ))
    }
}
