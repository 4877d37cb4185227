//! Postfix expression parsing: calls, method calls, field access, indexing.
//!
//! A `(` or `[` that starts a new line begins a new statement rather than
//! continuing the expression before it.

use mol_ir::ast::{Expr, ExprKind};
use mol_ir::TokenKind;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a primary expression followed by any number of postfix operators.
    pub(crate) fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_ident_or_keyword()?;
                    if self.check(TokenKind::LParen) && !self.has_newline_before() {
                        let args = self.parse_call_args()?;
                        let span = expr.span.merge(self.previous_span());
                        expr = Expr::new(
                            ExprKind::MethodCall {
                                receiver: Box::new(expr),
                                method: name,
                                args,
                            },
                            span,
                        );
                    } else {
                        let span = expr.span.merge(self.previous_span());
                        expr = Expr::new(
                            ExprKind::Field {
                                receiver: Box::new(expr),
                                field: name,
                            },
                            span,
                        );
                    }
                }
                TokenKind::LParen if !self.has_newline_before() => {
                    let args = self.parse_call_args()?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket if !self.has_newline_before() => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Index {
                            receiver: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `( expr, expr, ... )` with an optional trailing comma.
    pub(crate) fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}
