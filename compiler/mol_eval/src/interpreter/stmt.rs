//! Statement execution.

use std::rc::Rc;

use mol_ir::ast::{Block, Expr, FunctionDecl, RescueClause, Stmt, StmtKind};
use mol_ir::Name;
use mol_stack::ensure_sufficient_stack;

use super::{Flow, Interpreter};
use crate::callable::{Callable, UserFunction};
use crate::errors::{
    assign_to_undefined, guard_failed, index_out_of_bounds, iteration_limit_exceeded,
    not_indexable, not_iterable, undefined_field, wrong_arg_type, EvalError,
};
use crate::value::{as_integer, Value};

/// Message of a `guard` without one of its own.
const DEFAULT_GUARD_MESSAGE: &str = "Guard assertion failed";

impl Interpreter<'_> {
    /// Execute one statement.
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, EvalError> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt)).map_err(|e| e.with_span(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> Result<Flow, EvalError> {
        match &stmt.kind {
            StmtKind::Show(expr) => {
                let value = self.eval(expr)?;
                self.print(&value.to_string());
            }
            StmtKind::Let { name, ty, value } => {
                let value = self.eval(value)?;
                if let Some(ty) = ty {
                    self.check_declared_type(&value, ty.name, *name)?;
                }
                self.env.define(*name, value);
            }
            StmtKind::LetList { names, rest, value } => {
                let value = self.eval(value)?;
                self.destructure_list(names, *rest, &value)?;
            }
            StmtKind::LetMap { keys, value } => {
                let value = self.eval(value)?;
                self.destructure_map(keys, &value)?;
            }
            StmtKind::Set { name, value } => {
                let value = self.eval(value)?;
                if self.env.assign(*name, value).is_err() {
                    return Err(assign_to_undefined(self.name_str(*name)));
                }
            }
            StmtKind::SetField {
                target,
                field,
                value,
            } => self.exec_set_field(target, *field, value)?,
            StmtKind::SetIndex {
                target,
                index,
                value,
            } => self.exec_set_index(target, index, value)?,
            StmtKind::If {
                branches,
                else_body,
            } => return self.exec_if(branches, else_body.as_deref()),
            StmtKind::While { condition, body } => return self.exec_while(condition, body),
            StmtKind::For {
                var,
                iterable,
                body,
            } => return self.exec_for(*var, iterable, body),
            StmtKind::Function(decl) => {
                let function = self.make_function(decl);
                self.env.define(decl.name, function);
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::Guard { condition, message } => {
                if !self.eval(condition)?.is_truthy() {
                    let message = message.as_deref().unwrap_or(DEFAULT_GUARD_MESSAGE);
                    return Err(guard_failed(message));
                }
            }
            StmtKind::Try {
                body,
                rescue,
                ensure,
            } => return self.exec_try(body, rescue.as_ref(), ensure.as_deref()),
            StmtKind::Block(body) => return self.exec_scoped_block(body),
            StmtKind::Trigger(event) => self.exec_trigger(event)?,
            StmtKind::Listen { event, body } => self.exec_listen(event, body)?,
            StmtKind::Link { source, target } => self.exec_link(source, target)?,
            StmtKind::Process { target, with } => self.exec_process(target, with.as_ref())?,
            StmtKind::Access(resource) => self.exec_access(resource)?,
            StmtKind::Sync(stream) => self.exec_sync(stream)?,
            StmtKind::Evolve(node) => self.exec_evolve(node)?,
            StmtKind::Emit(data) => self.exec_emit(data)?,
            StmtKind::Expr(expr) => {
                self.eval(expr)?;
            }
        }
        Ok(Flow::Normal)
    }

    /// Bind a `define`, `pipeline` or lambda to the current scope.
    pub(crate) fn make_function(&self, decl: &Rc<FunctionDecl>) -> Value {
        let name: Rc<str> = if decl.name == Name::EMPTY {
            Rc::from("<lambda>")
        } else {
            Rc::from(self.name_str(decl.name))
        };
        Value::Function(Callable::User(Rc::new(UserFunction {
            name,
            decl: Rc::clone(decl),
            closure: self.env.current_scope(),
        })))
    }

    /// `let [a, b, ...rest] be xs`. Missing items bind `null`.
    fn destructure_list(
        &mut self,
        names: &[Name],
        rest: Option<Name>,
        value: &Value,
    ) -> Result<(), EvalError> {
        let items = value.expect_list("let")?;
        let items = items.borrow().clone();
        let mut iter = items.into_iter();
        for name in names {
            self.env.define(*name, iter.next().unwrap_or(Value::Null));
        }
        if let Some(rest) = rest {
            self.env.define(rest, Value::list(iter.collect()));
        }
        Ok(())
    }

    /// `let {a, b} be m`. Missing keys bind `null`.
    fn destructure_map(&mut self, keys: &[Name], value: &Value) -> Result<(), EvalError> {
        for key in keys {
            let field = self.name_str(*key);
            let bound = match value {
                Value::Map(map) => map.borrow().get(field).cloned().unwrap_or(Value::Null),
                Value::Record(record) => record.field(field).unwrap_or(Value::Null),
                other => return Err(wrong_arg_type("let", "a Map", other.type_name())),
            };
            self.env.define(*key, bound);
        }
        Ok(())
    }

    fn exec_set_field(&mut self, target: &Expr, field: Name, value: &Expr) -> Result<(), EvalError> {
        let target = self.eval(target)?;
        let value = self.eval(value)?;
        let field = self.name_str(field);
        match &target {
            Value::Map(map) => {
                map.borrow_mut().insert(field, value);
                Ok(())
            }
            Value::Record(record) => record.set_field(field, value),
            other => Err(undefined_field(field, other.type_name())),
        }
    }

    fn exec_set_index(&mut self, target: &Expr, index: &Expr, value: &Expr) -> Result<(), EvalError> {
        let target = self.eval(target)?;
        let index = self.eval(index)?;
        let value = self.eval(value)?;
        match (&target, &index) {
            (Value::List(items), Value::Number(n)) => {
                let mut items = items.borrow_mut();
                let slot = resolve_index(*n, items.len())?;
                items[slot] = value;
                Ok(())
            }
            (Value::Map(map), Value::Text(key)) => {
                map.borrow_mut().insert(Rc::clone(key), value);
                Ok(())
            }
            _ => Err(not_indexable(target.type_name())),
        }
    }

    fn exec_if(
        &mut self,
        branches: &[(Expr, Block)],
        else_body: Option<&[Stmt]>,
    ) -> Result<Flow, EvalError> {
        for (condition, body) in branches {
            if self.eval(condition)?.is_truthy() {
                return self.exec_scoped_block(body);
            }
        }
        match else_body {
            Some(body) => self.exec_scoped_block(body),
            None => Ok(Flow::Normal),
        }
    }

    /// At most `max_loop_iterations` bodies run; the next attempt fails.
    fn exec_while(&mut self, condition: &Expr, body: &[Stmt]) -> Result<Flow, EvalError> {
        let limit = self.config.max_loop_iterations;
        let mut iterations = 0usize;
        while self.eval(condition)?.is_truthy() {
            if iterations == limit {
                return Err(iteration_limit_exceeded(limit));
            }
            iterations += 1;
            if let Flow::Return(value) = self.exec_scoped_block(body)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Iterates a snapshot: list items, text characters or map keys.
    fn exec_for(&mut self, var: Name, iterable: &Expr, body: &[Stmt]) -> Result<Flow, EvalError> {
        let items: Vec<Value> = match self.eval(iterable)? {
            Value::List(items) => items.borrow().clone(),
            Value::Text(text) => text.chars().map(|c| Value::text(c.to_string())).collect(),
            Value::Map(map) => map.borrow().keys().map(|k| Value::Text(Rc::clone(k))).collect(),
            other => return Err(not_iterable(other.type_name())),
        };

        let limit = self.config.max_loop_iterations;
        for (iterations, item) in items.into_iter().enumerate() {
            if iterations == limit {
                return Err(iteration_limit_exceeded(limit));
            }
            let flow = self.with_binding(var, item, |scoped| scoped.exec_block(body))?;
            if let Flow::Return(value) = flow {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// `try .. rescue e .. ensure .. end`.
    ///
    /// Without a `rescue` clause the error propagates after `ensure` has run.
    /// `ensure` also runs when the body or the rescue block returns; a
    /// `return` inside `ensure` itself takes precedence.
    fn exec_try(
        &mut self,
        body: &[Stmt],
        rescue: Option<&RescueClause>,
        ensure: Option<&[Stmt]>,
    ) -> Result<Flow, EvalError> {
        let outcome = match (self.exec_scoped_block(body), rescue) {
            (Err(err), Some(clause)) => {
                tracing::debug!(error = %err, "rescued");
                self.with_env_scope(|scoped| {
                    if let Some(name) = clause.name {
                        scoped.env.define(name, Value::text(err.to_string()));
                    }
                    scoped.exec_block(&clause.body)
                })
            }
            (outcome, _) => outcome,
        };

        if let Some(ensure) = ensure {
            if let Flow::Return(value) = self.exec_scoped_block(ensure)? {
                return Ok(Flow::Return(value));
            }
        }
        outcome
    }
}

/// Position for `index` in a sequence of `len`; negative counts from the end.
pub(crate) fn resolve_index(index: f64, len: usize) -> Result<usize, EvalError> {
    let Some(i) = as_integer(index) else {
        return Err(wrong_arg_type("index", "a whole Number", "Number"));
    };
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if i < 0 { i + len_i } else { i };
    usize::try_from(resolved)
        .ok()
        .filter(|&slot| slot < len)
        .ok_or_else(|| index_out_of_bounds(i, len))
}
