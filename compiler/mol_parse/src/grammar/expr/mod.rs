//! Expression parsing.
//!
//! # Module Structure
//!
//! - `mod.rs`: entry point (`parse_expr`) and the binary precedence chain
//! - `operators.rs`: operator matching helpers
//! - `postfix.rs`: call, method call, field, index
//! - `primary.rs`: literals, names, lists, maps, lambdas, `match`
//!
//! Precedence, lowest first:
//! `|>` < `??` < `or` < `and` < `not` < comparison < `+ -` < `* / %` <
//! unary `-` < postfix.

mod operators;
mod postfix;
mod primary;

use mol_ir::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use mol_ir::TokenKind;
use mol_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

/// Combine two operands under a binary operator.
fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

impl Parser<'_> {
    /// Parse an expression.
    ///
    /// Uses `ensure_sufficient_stack` to prevent stack overflow
    /// on deeply nested expressions.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_pipe())
    }

    /// `seed |> stage |> ...`, flattened into one `Pipe` node.
    fn parse_pipe(&mut self) -> Result<Expr, ParseError> {
        let seed = self.parse_coalesce()?;
        if !self.check(TokenKind::PipeArrow) {
            return Ok(seed);
        }

        let mut stages = Vec::new();
        while self.eat(TokenKind::PipeArrow) {
            stages.push(self.parse_coalesce()?);
        }
        let end = stages.last().map_or(seed.span, |s| s.span);
        let span = seed.span.merge(end);
        Ok(Expr::new(
            ExprKind::Pipe {
                seed: Box::new(seed),
                stages,
            },
            span,
        ))
    }

    /// `a ?? b`
    fn parse_coalesce(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_or()?;
        while self.eat(TokenKind::DoubleQuestion) {
            let right = self.parse_or()?;
            left = binary(BinaryOp::Coalesce, left, right);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.eat(TokenKind::And) {
            let right = self.parse_not()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    /// Prefix `not`.
    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if !self.check(TokenKind::Not) {
            return self.parse_comparison();
        }
        let start = self.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_not())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `== != < <= > >= is` and `is not`, left-associative.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_comparison_op() {
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// Prefix `-`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if !self.check(TokenKind::Minus) {
            return self.parse_postfix_expr();
        }
        let start = self.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            },
            span,
        ))
    }
}
