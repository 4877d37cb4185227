//! The standard library.
//!
//! Every function here is a [`HostFunction`]: a name, an arity range and a
//! plain `fn` body. A [`Registry`] collects them and binds each one into the
//! global scope of a fresh interpreter. The evaluator itself knows none of
//! these names.

mod basic;
mod collections;
mod domain;
mod functional;
mod guards;
mod json;
mod text;

use mol_ir::StringInterner;

use crate::callable::{Callable, HostFunction};
use crate::environment::Environment;
use crate::errors::{wrong_arg_type, EvalError};
use crate::value::{as_integer, Record, Value};

/// A set of host functions, keyed by name.
///
/// Built once before evaluation and only read afterwards; each interpreter
/// gets its own bindings, so independent runs never share state.
#[derive(Clone, Default)]
pub struct Registry {
    functions: Vec<HostFunction>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Every function of the standard library.
    pub fn standard() -> Self {
        let mut registry = Registry::new();
        for group in [
            basic::FUNCTIONS,
            text::FUNCTIONS,
            collections::FUNCTIONS,
            functional::FUNCTIONS,
            json::FUNCTIONS,
            guards::FUNCTIONS,
            domain::FUNCTIONS,
        ] {
            for &function in group {
                registry.register(function);
            }
        }
        registry
    }

    /// Add a function, replacing any earlier one with the same name.
    pub fn register(&mut self, function: HostFunction) {
        match self.functions.iter_mut().find(|f| f.name == function.name) {
            Some(existing) => *existing = function,
            None => self.functions.push(function),
        }
    }

    pub fn get(&self, name: &str) -> Option<&HostFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.iter().map(|f| f.name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Bind every function into the global scope of `env`.
    pub fn install(&self, env: &mut Environment, interner: &StringInterner) {
        tracing::debug!(functions = self.functions.len(), "installing host functions");
        for &function in &self.functions {
            env.define_global(
                interner.intern(function.name),
                Value::Function(Callable::Host(function)),
            );
        }
    }
}

// Argument helpers shared by the function groups.

/// The optional argument at `index`.
fn optional(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index)
}

/// A whole number, truncating any fraction.
fn whole(value: &Value, function: &str) -> Result<i64, EvalError> {
    let n = value.expect_number(function)?;
    as_integer(n.trunc()).ok_or_else(|| wrong_arg_type(function, "a whole Number", "Number"))
}

/// Text carried by a record with content, or the value's text form.
fn content_of(value: &Value) -> String {
    match value {
        Value::Record(Record::Thought(t)) => t.borrow().content.clone(),
        Value::Record(Record::Document(d)) => d.borrow().content.clone(),
        Value::Record(Record::Chunk(c)) => c.borrow().content.clone(),
        other => other.to_string(),
    }
}

/// Start and end offsets of `[start:end]` over a sequence of `len`
/// items; negative positions count from the end and both are clamped.
fn slice_bounds(len: usize, start: i64, end: Option<i64>) -> (usize, usize) {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |i: i64| {
        let i = if i < 0 { i + len_i } else { i };
        usize::try_from(i.clamp(0, len_i)).unwrap_or(0)
    };
    let start = clamp(start);
    let end = end.map_or(len, clamp);
    (start, end.max(start))
}
