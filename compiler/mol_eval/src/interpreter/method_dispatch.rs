//! Method call dispatch.
//!
//! Lookup order for `receiver.method(args)`:
//! 1. built-in methods of lists (`push`, `pop`, `length`) and text (`length`)
//! 2. a function stored under `method` in a map receiver
//! 3. methods of a domain record
//! 4. a function named `method` in scope, called with the receiver first
//!    (`"abc".upper()` is `upper("abc")`)

use mol_ir::Name;

use super::Interpreter;
use crate::errors::{arity_mismatch, no_such_method, EvalError, EvalResult};
use crate::value::Value;

impl Interpreter<'_> {
    pub(super) fn call_method(
        &mut self,
        receiver: Value,
        method: Name,
        args: Vec<Value>,
    ) -> EvalResult {
        let method_name = self.name_str(method);
        if let Some(result) = builtin_method(&receiver, method_name, &args) {
            return result;
        }
        match &receiver {
            Value::Map(map) => {
                let entry = map.borrow().get(method_name).cloned();
                if let Some(function @ Value::Function(_)) = entry {
                    return self.invoke(&function, args);
                }
            }
            Value::Record(record) => return record.call_method(method_name, &args),
            _ => {}
        }

        match self.env.lookup(method) {
            Some(function @ Value::Function(_)) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(receiver);
                full.extend(args);
                self.invoke(&function, full)
            }
            _ => Err(no_such_method(method_name, receiver.type_name())),
        }
    }
}

/// Methods built into lists and text. `None` when `method` is not one.
fn builtin_method(receiver: &Value, method: &str, args: &[Value]) -> Option<EvalResult> {
    let result = match (receiver, method) {
        (Value::List(items), "push") => expect_args(method, args, 1).map(|()| {
            items.borrow_mut().push(args[0].clone());
            receiver.clone()
        }),
        (Value::List(items), "pop") => expect_args(method, args, 0).and_then(|()| {
            items
                .borrow_mut()
                .pop()
                .ok_or_else(|| EvalError::new("pop from empty list"))
        }),
        (Value::List(items), "length") => {
            expect_args(method, args, 0).map(|()| Value::count(items.borrow().len()))
        }
        (Value::Text(text), "length") => {
            expect_args(method, args, 0).map(|()| Value::count(text.chars().count()))
        }
        _ => return None,
    };
    Some(result)
}

fn expect_args(method: &str, args: &[Value], count: usize) -> Result<(), EvalError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(arity_mismatch(method, count, Some(count), args.len()))
    }
}
