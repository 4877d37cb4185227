//! Expression evaluation.

use mol_ir::ast::{BinaryOp, Expr, ExprKind, FStringPart, MatchArm, Stmt, StmtKind};
use mol_ir::Name;
use mol_stack::ensure_sufficient_stack;

use super::matching::match_pattern;
use super::stmt::resolve_index;
use super::{Flow, Interpreter};
use crate::errors::{
    key_not_found, not_callable, not_indexable, undefined_field, undefined_variable, wrong_arg_type,
    EvalError, EvalResult,
};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::value::{MapValue, Value};

impl Interpreter<'_> {
    /// Evaluate an expression.
    ///
    /// Uses `ensure_sufficient_stack` so deeply nested expressions and deep
    /// recursion grow the stack instead of overflowing it.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr)).map_err(|e| e.with_span(expr.span))
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Text(s) => Ok(Value::text(s.as_str())),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::FString(parts) => self.eval_fstring(parts),
            ExprKind::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.eval(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(items))
            }
            ExprKind::Map(entries) => {
                let mut map = MapValue::new();
                for (key, value) in entries {
                    let value = self.eval(value)?;
                    map.insert(key.as_str(), value);
                }
                Ok(Value::map(map))
            }
            ExprKind::Var(name) => self.lookup_var(*name),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                evaluate_unary(&operand, *op)
            }
            ExprKind::Call { callee, args } => {
                let function = self.eval(callee)?;
                let args = self.eval_args(args)?;
                self.invoke_named(&function, args, callee)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval(receiver)?;
                let args = self.eval_args(args)?;
                self.call_method(receiver, *method, args)
            }
            ExprKind::Field { receiver, field } => {
                let receiver = self.eval(receiver)?;
                self.get_field(&receiver, *field)
            }
            ExprKind::Index { receiver, index } => {
                let receiver = self.eval(receiver)?;
                let index = self.eval(index)?;
                get_index(&receiver, &index)
            }
            ExprKind::Pipe { seed, stages } => self.eval_pipe(seed, stages),
            ExprKind::Lambda(decl) => Ok(self.make_function(decl)),
            ExprKind::Match { subject, arms } => {
                let subject = self.eval(subject)?;
                self.eval_match(&subject, arms)
            }
        }
    }

    fn lookup_var(&self, name: Name) -> EvalResult {
        self.env
            .lookup(name)
            .ok_or_else(|| undefined_variable(self.name_str(name)))
    }

    pub(super) fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    /// Call `function`, naming the callee expression if it is not callable.
    pub(super) fn invoke_named(
        &mut self,
        function: &Value,
        args: Vec<Value>,
        callee: &Expr,
    ) -> EvalResult {
        if !matches!(function, Value::Function(_)) {
            let name = match &callee.kind {
                ExprKind::Var(name) => self.name_str(*name),
                _ => function.type_name(),
            };
            return Err(not_callable(name));
        }
        self.invoke(function, args)
    }

    /// `and`, `or` and `??` only evaluate the right side when needed.
    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        let left = self.eval(left)?;
        let short_circuits = match op {
            BinaryOp::And => !left.is_truthy(),
            BinaryOp::Or => left.is_truthy(),
            BinaryOp::Coalesce => !matches!(left, Value::Null),
            _ => false,
        };
        if short_circuits {
            return Ok(left);
        }
        let right = self.eval(right)?;
        evaluate_binary(left, right, op)
    }

    fn eval_fstring(&mut self, parts: &[FStringPart]) -> EvalResult {
        let mut out = String::new();
        for part in parts {
            match part {
                FStringPart::Literal(text) => out.push_str(text),
                FStringPart::Expr(expr) => {
                    let value = self.eval(expr)?;
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(Value::text(out))
    }

    /// Map keys, then record fields.
    pub(super) fn get_field(&self, receiver: &Value, field: Name) -> EvalResult {
        let field = self.name_str(field);
        match receiver {
            Value::Map(map) => map
                .borrow()
                .get(field)
                .cloned()
                .ok_or_else(|| key_not_found(field)),
            Value::Record(record) => record.field(field),
            other => Err(undefined_field(field, other.type_name())),
        }
    }

    /// The first arm whose pattern matches and whose `when` guard holds
    /// gives the value; `null` when no arm applies.
    fn eval_match(&mut self, subject: &Value, arms: &[MatchArm]) -> EvalResult {
        for arm in arms {
            let mut bindings = Vec::new();
            if !match_pattern(&arm.pattern, subject, &mut bindings) {
                continue;
            }
            let outcome = self.with_bindings(bindings, |scoped| -> Result<Option<Value>, EvalError> {
                if let Some(guard) = &arm.guard {
                    if !scoped.eval(guard)?.is_truthy() {
                        return Ok(None);
                    }
                }
                scoped.eval_arm_body(&arm.body).map(Some)
            })?;
            if let Some(value) = outcome {
                return Ok(value);
            }
        }
        Ok(Value::Null)
    }

    /// The value of an arm: its last expression statement, or the value of
    /// a `return` that ends it.
    fn eval_arm_body(&mut self, body: &[Stmt]) -> EvalResult {
        let mut value = Value::Null;
        for stmt in body {
            if let StmtKind::Expr(expr) = &stmt.kind {
                value = self.eval(expr)?;
                continue;
            }
            value = Value::Null;
            if let Flow::Return(returned) = self.exec_stmt(stmt)? {
                return Ok(returned);
            }
        }
        Ok(value)
    }
}

/// `list[i]`, `text[i]` (negative counts from the end) and `map[key]`.
fn get_index(receiver: &Value, index: &Value) -> EvalResult {
    match (receiver, index) {
        (Value::List(items), Value::Number(n)) => {
            let items = items.borrow();
            let slot = resolve_index(*n, items.len())?;
            Ok(items[slot].clone())
        }
        (Value::Text(text), Value::Number(n)) => {
            let chars: Vec<char> = text.chars().collect();
            let slot = resolve_index(*n, chars.len())?;
            Ok(Value::text(chars[slot].to_string()))
        }
        (Value::Map(map), Value::Text(key)) => map
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| key_not_found(key)),
        (Value::List(_) | Value::Text(_) | Value::Map(_), other) => Err(wrong_arg_type(
            "index",
            "a Number or Text key",
            other.type_name(),
        )),
        (other, _) => Err(not_indexable(other.type_name())),
    }
}

impl Interpreter<'_> {
    /// Bind a name in the current scope. Used by embedders to seed globals.
    pub fn define(&mut self, name: &str, value: Value) {
        let name = self.interner.intern(name);
        self.env.define(name, value);
    }
}
