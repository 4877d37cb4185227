//! Callable values.
//!
//! Two kinds of function share one invocation contract: a [`UserFunction`]
//! declared in MOL (with its captured scope) and a [`HostFunction`] provided
//! by the embedding layer. The interpreter only ever sees `Callable`; host
//! functions reach back into it through [`HostContext`].

use std::fmt;
use std::rc::Rc;

use mol_ir::ast::FunctionDecl;

use crate::environment::{LocalScope, Scope};
use crate::errors::{arity_mismatch, EvalError, EvalResult};
use crate::value::Value;

/// What a host function may ask of the running interpreter.
pub trait HostContext {
    /// Invoke a MOL value as a function.
    fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult;

    /// Write one line to the program-output channel.
    fn print_line(&mut self, line: &str);

    /// Next id for a freshly constructed domain record.
    fn next_record_id(&mut self) -> u32;

    /// The run's vector store called `name`, created on first use.
    fn named_store(&mut self, name: &str) -> Value;

    /// The run's vector store called `name`, if one was created.
    fn find_store(&self, name: &str) -> Option<Value>;
}

/// Host function body.
pub type HostFn = fn(&mut dyn HostContext, &[Value]) -> EvalResult;

/// A function implemented in Rust.
#[derive(Clone, Copy)]
pub struct HostFunction {
    pub name: &'static str,
    pub min_args: usize,
    /// `None` for variadic functions.
    pub max_args: Option<usize>,
    pub func: HostFn,
}

impl HostFunction {
    pub const fn new(name: &'static str, min_args: usize, max_args: Option<usize>, func: HostFn) -> Self {
        HostFunction {
            name,
            min_args,
            max_args,
            func,
        }
    }

    pub fn check_arity(&self, got: usize) -> Result<(), EvalError> {
        let too_many = self.max_args.is_some_and(|max| got > max);
        if got < self.min_args || too_many {
            return Err(arity_mismatch(self.name, self.min_args, self.max_args, got));
        }
        Ok(())
    }
}

/// A `define`, `pipeline` or lambda together with the scope it closed over.
pub struct UserFunction {
    /// Resolved name; `<lambda>` for lambdas.
    pub name: Rc<str>,
    pub decl: Rc<FunctionDecl>,
    pub closure: LocalScope<Scope>,
}

/// Anything that can be invoked.
#[derive(Clone)]
pub enum Callable {
    User(Rc<UserFunction>),
    Host(HostFunction),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::User(f) => &f.name,
            Callable::Host(f) => f.name,
        }
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::User(a), Callable::User(b)) => Rc::ptr_eq(a, b),
            (Callable::Host(a), Callable::Host(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn noop(_: &mut dyn HostContext, _: &[Value]) -> EvalResult {
        Ok(Value::Null)
    }

    #[test]
    fn test_host_arity_bounds() {
        let fixed = HostFunction::new("len", 1, Some(1), noop);
        assert!(fixed.check_arity(1).is_ok());
        assert_eq!(
            fixed.check_arity(2).map_err(|e| e.message),
            Err("'len' expects 1 args, got 2".to_string())
        );

        let variadic = HostFunction::new("max", 1, None, noop);
        assert!(variadic.check_arity(7).is_ok());
        assert!(variadic.check_arity(0).is_err());
    }

    #[test]
    fn test_host_identity_is_by_name() {
        let a = Callable::Host(HostFunction::new("len", 1, Some(1), noop));
        let b = Callable::Host(HostFunction::new("len", 1, Some(1), noop));
        let c = Callable::Host(HostFunction::new("abs", 1, Some(1), noop));
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert_eq!(format!("{a:?}"), "Function(len)");
    }
}
