//! Function call evaluation methods for the Interpreter.

use std::rc::Rc;

use mol_ir::ast::FunctionBody;

use super::{Flow, Interpreter};
use crate::callable::{Callable, UserFunction};
use crate::errors::{arity_mismatch, not_callable, recursion_limit_exceeded, EvalResult};
use crate::value::Value;

impl Interpreter<'_> {
    /// Invoke a callable value with already-evaluated arguments.
    pub fn invoke(&mut self, function: &Value, args: Vec<Value>) -> EvalResult {
        match function {
            Value::Function(Callable::User(f)) => self.call_user(f, args),
            Value::Function(Callable::Host(f)) => {
                f.check_arity(args.len())?;
                (f.func)(self, &args)
            }
            other => Err(not_callable(other.type_name())),
        }
    }

    /// Run a user function in a frame over its captured scope.
    ///
    /// Missing trailing arguments take their parameter defaults, evaluated
    /// in the new frame after the earlier parameters are bound.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %func.name))]
    fn call_user(&mut self, func: &Rc<UserFunction>, args: Vec<Value>) -> EvalResult {
        let decl = &func.decl;
        let required = decl.required_params();
        let total = decl.params.len();
        if args.len() < required || args.len() > total {
            return Err(arity_mismatch(&func.name, required, Some(total), args.len()));
        }
        let limit = self.config.max_call_depth;
        if self.call_stack.len() >= limit {
            return Err(recursion_limit_exceeded(limit));
        }

        self.call_stack.push(Rc::clone(&func.name));
        let result = self.with_frame(&func.closure, |interp| {
            let mut args = args.into_iter();
            for param in &decl.params {
                let value = match (args.next(), &param.default) {
                    (Some(value), _) => value,
                    (None, Some(default)) => interp.eval(default)?,
                    (None, None) => Value::Null,
                };
                if let Some(ty) = param.ty {
                    interp
                        .check_declared_type(&value, ty.name, param.name)
                        .map_err(|e| e.with_span(param.span))?;
                }
                interp.env.define(param.name, value);
            }
            match &decl.body {
                FunctionBody::Block(body) => match interp.exec_block(body)? {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal => Ok(Value::Null),
                },
                FunctionBody::Expr(body) => interp.eval(body),
            }
        });
        let result = result.map_err(|e| e.with_call_stack(self.call_stack_names()));
        self.call_stack.pop();
        result
    }
}
