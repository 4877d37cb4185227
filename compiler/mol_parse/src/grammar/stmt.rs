//! Statement parsing.
//!
//! Every compound statement closes with `end`. Blocks are parsed until one of
//! their terminator keywords; running into end of input first reports the
//! keyword that opened the block.

use std::rc::Rc;

use mol_diagnostic::ErrorCode;
use mol_ir::ast::{
    Block, ExprKind, FunctionBody, FunctionDecl, FunctionKind, Param, RescueClause, Stmt,
    StmtKind, TypeAnnotation,
};
use mol_ir::{Name, Span, TokenKind};
use mol_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let stmt = ensure_sufficient_stack(|| self.parse_stmt_inner())?;
        while self.eat(TokenKind::Semicolon) {}
        Ok(stmt)
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Show => {
                self.advance();
                StmtKind::Show(self.parse_expr()?)
            }
            TokenKind::Let => self.parse_let()?,
            TokenKind::Set => self.parse_set()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Define => {
                StmtKind::Function(self.parse_function_decl(FunctionKind::Function)?)
            }
            TokenKind::Pipeline => {
                StmtKind::Function(self.parse_function_decl(FunctionKind::Pipeline)?)
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.can_start_expr() {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                StmtKind::Return(value)
            }
            TokenKind::Guard => self.parse_guard()?,
            TokenKind::Try => self.parse_try()?,
            TokenKind::Begin => {
                let opened_at = self.advance().span;
                let body = self.parse_block_until(&[TokenKind::End], "begin", opened_at)?;
                self.expect(TokenKind::End)?;
                StmtKind::Block(body)
            }
            TokenKind::Trigger => {
                self.advance();
                StmtKind::Trigger(self.parse_expr()?)
            }
            TokenKind::Listen => {
                let opened_at = self.advance().span;
                let event = self.parse_expr()?;
                self.expect(TokenKind::Do)?;
                let body = self.parse_block_until(&[TokenKind::End], "listen", opened_at)?;
                self.expect(TokenKind::End)?;
                StmtKind::Listen {
                    event,
                    body: Rc::from(body),
                }
            }
            TokenKind::Link => {
                self.advance();
                let source = self.parse_expr()?;
                self.expect(TokenKind::To)?;
                let target = self.parse_expr()?;
                StmtKind::Link { source, target }
            }
            TokenKind::Process => {
                self.advance();
                let target = self.parse_expr()?;
                let with = if self.eat(TokenKind::With) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                StmtKind::Process { target, with }
            }
            TokenKind::Access => {
                self.advance();
                StmtKind::Access(self.parse_expr()?)
            }
            TokenKind::Sync => {
                self.advance();
                StmtKind::Sync(self.parse_expr()?)
            }
            TokenKind::Evolve => {
                self.advance();
                StmtKind::Evolve(self.parse_expr()?)
            }
            TokenKind::Emit => {
                self.advance();
                StmtKind::Emit(self.parse_expr()?)
            }
            _ => StmtKind::Expr(self.parse_expr()?),
        };
        Ok(Stmt::new(kind, start.merge(self.previous_span())))
    }

    /// Parse statements up to (not including) one of `terminators`.
    pub(crate) fn parse_block_until(
        &mut self,
        terminators: &[TokenKind],
        keyword: &str,
        opened_at: Span,
    ) -> Result<Block, ParseError> {
        let mut body = Vec::new();
        while !self.check_any(terminators) {
            if self.is_at_end() {
                return Err(ParseError::unclosed_block(
                    keyword,
                    opened_at,
                    self.current_span(),
                ));
            }
            body.push(self.parse_stmt()?);
        }
        Ok(body)
    }

    /// `let name (: Type)? be e`, `let [a, ...rest] be e`, `let {a, b} be e`
    fn parse_let(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        match self.current_kind() {
            TokenKind::LBracket => {
                self.advance();
                let mut names = Vec::new();
                let mut rest = None;
                while !self.check(TokenKind::RBracket) {
                    if self.eat(TokenKind::DotDotDot) {
                        rest = Some(self.expect_ident()?);
                        break;
                    }
                    names.push(self.expect_ident()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket)?;
                self.expect(TokenKind::Be)?;
                let value = self.parse_expr()?;
                Ok(StmtKind::LetList { names, rest, value })
            }
            TokenKind::LBrace => {
                self.advance();
                let mut keys = Vec::new();
                while !self.check(TokenKind::RBrace) {
                    keys.push(self.expect_ident_or_keyword()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace)?;
                self.expect(TokenKind::Be)?;
                let value = self.parse_expr()?;
                Ok(StmtKind::LetMap { keys, value })
            }
            _ => {
                let name = self.expect_ident()?;
                let ty = self.parse_type_annotation()?;
                self.expect(TokenKind::Be)?;
                let value = self.parse_expr()?;
                Ok(StmtKind::Let { name, ty, value })
            }
        }
    }

    /// Optional `: Type` after a binding name.
    fn parse_type_annotation(&mut self) -> Result<Option<TypeAnnotation>, ParseError> {
        if !self.eat(TokenKind::Colon) {
            return Ok(None);
        }
        let span = self.current_span();
        let name = self.expect_ident()?;
        Ok(Some(TypeAnnotation { name, span }))
    }

    /// `set target to e` where target is a name, field or index.
    fn parse_set(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let target = self.parse_postfix_expr()?;
        let target_span = target.span;
        self.expect(TokenKind::To)?;
        let value = self.parse_expr()?;
        match target.kind {
            ExprKind::Var(name) => Ok(StmtKind::Set { name, value }),
            ExprKind::Field { receiver, field } => Ok(StmtKind::SetField {
                target: *receiver,
                field,
                value,
            }),
            ExprKind::Index { receiver, index } => Ok(StmtKind::SetIndex {
                target: *receiver,
                index: *index,
                value,
            }),
            _ => Err(ParseError::new(
                ErrorCode::E1004,
                "invalid assignment target",
                target_span,
            )
            .with_context("expected a variable, field or index")),
        }
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        const BRANCH_END: &[TokenKind] = &[TokenKind::Elif, TokenKind::Else, TokenKind::End];

        let opened_at = self.advance().span;
        let mut branches = Vec::new();

        let condition = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let body = self.parse_block_until(BRANCH_END, "if", opened_at)?;
        branches.push((condition, body));

        while self.eat(TokenKind::Elif) {
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let body = self.parse_block_until(BRANCH_END, "if", opened_at)?;
            branches.push((condition, body));
        }

        let else_body = if self.eat(TokenKind::Else) {
            Some(self.parse_block_until(&[TokenKind::End], "if", opened_at)?)
        } else {
            None
        };
        self.expect(TokenKind::End)?;
        Ok(StmtKind::If {
            branches,
            else_body,
        })
    }

    fn parse_while(&mut self) -> Result<StmtKind, ParseError> {
        let opened_at = self.advance().span;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block_until(&[TokenKind::End], "while", opened_at)?;
        self.expect(TokenKind::End)?;
        Ok(StmtKind::While { condition, body })
    }

    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        let opened_at = self.advance().span;
        let var = self.expect_ident()?;
        self.expect(TokenKind::In)?;
        let iterable = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block_until(&[TokenKind::End], "for", opened_at)?;
        self.expect(TokenKind::End)?;
        Ok(StmtKind::For {
            var,
            iterable,
            body,
        })
    }

    /// `define name(params) body end` or `pipeline name(params) body end`.
    fn parse_function_decl(&mut self, kind: FunctionKind) -> Result<Rc<FunctionDecl>, ParseError> {
        let opened_at = self.advance().span;
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        let body = self.parse_block_until(&[TokenKind::End], kind.keyword(), opened_at)?;
        self.expect(TokenKind::End)?;
        Ok(Rc::new(FunctionDecl {
            name,
            kind,
            params,
            body: FunctionBody::Block(body),
            span: opened_at.merge(self.previous_span()),
        }))
    }

    /// `( name (: Type)? (be default)?, ... )`
    ///
    /// Parameters with defaults must come after all required ones.
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params: Vec<Param> = Vec::new();
        while !self.check(TokenKind::RParen) {
            let start = self.current_span();
            let name = self.expect_ident()?;
            let ty = self.parse_type_annotation()?;
            let default = if self.eat(TokenKind::Be) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let span = start.merge(self.previous_span());
            if default.is_none() && params.iter().any(|p| p.default.is_some()) {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "required parameter follows a parameter with a default",
                    span,
                )
                .with_context("give this parameter a default or move it earlier"));
            }
            params.push(Param {
                name,
                ty,
                default,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// `guard cond` or `guard cond : "message"`
    fn parse_guard(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let condition = self.parse_expr()?;
        let message = if self.eat(TokenKind::Colon) {
            if let TokenKind::String(text) = self.current_kind() {
                self.advance();
                Some(self.interner().lookup(text).to_string())
            } else {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    format!(
                        "expected guard message string, found {}",
                        self.current_kind().display_name()
                    ),
                    self.current_span(),
                ));
            }
        } else {
            None
        };
        Ok(StmtKind::Guard { condition, message })
    }

    /// `try .. (rescue name? ..)? (ensure ..)? end`
    fn parse_try(&mut self) -> Result<StmtKind, ParseError> {
        const BODY_END: &[TokenKind] = &[TokenKind::Rescue, TokenKind::Ensure, TokenKind::End];

        let opened_at = self.advance().span;
        let body = self.parse_block_until(BODY_END, "try", opened_at)?;

        let rescue = if self.eat(TokenKind::Rescue) {
            let name = self.parse_rescue_binding();
            let body =
                self.parse_block_until(&[TokenKind::Ensure, TokenKind::End], "try", opened_at)?;
            Some(RescueClause { name, body })
        } else {
            None
        };

        let ensure = if self.eat(TokenKind::Ensure) {
            Some(self.parse_block_until(&[TokenKind::End], "try", opened_at)?)
        } else {
            None
        };
        self.expect(TokenKind::End)?;
        Ok(StmtKind::Try {
            body,
            rescue,
            ensure,
        })
    }

    /// The error binding after `rescue`: an identifier on the same line that
    /// does not itself begin a call, field access, index or pipe.
    fn parse_rescue_binding(&mut self) -> Option<Name> {
        let TokenKind::Ident(name) = self.current_kind() else {
            return None;
        };
        if self.has_newline_before() {
            return None;
        }
        let continues = matches!(
            self.peek_kind_at(1),
            TokenKind::LParen | TokenKind::LBracket | TokenKind::Dot | TokenKind::PipeArrow
        );
        if continues {
            return None;
        }
        self.advance();
        Some(name)
    }

    /// Whether the current token can begin an expression.
    pub(crate) fn can_start_expr(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::FString(_)
                | TokenKind::Ident(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Fn
                | TokenKind::Match
                | TokenKind::Minus
                | TokenKind::Not
        )
    }
}
