//! Tree-walking interpreter for MOL.
//!
//! # Architecture
//!
//! Statements execute through `exec_stmt` and report how control leaves
//! them as a [`Flow`]; expressions evaluate through `eval` to a [`Value`].
//! Errors travel on the `Err` side of both and are never used for `return`.
//!
//! - `stmt.rs`: control flow, bindings, `try`
//! - `domain.rs`: `trigger`, `listen`, `link` and the other domain statements
//! - `expr.rs`: expressions, field and index access, `match`
//! - `function_call.rs`: the call protocol for user and host functions
//! - `method_dispatch.rs`: `receiver.method(..)`
//! - `pipe_eval.rs`: pipe chains and their traces
//! - `scope_guard.rs`: scope and frame management
//!
//! # Frames
//!
//! A user function runs in a fresh [`Environment`] whose base scope is a
//! child of the scope the function closed over. The caller's environment is
//! set aside for the duration of the call and restored afterwards, so a
//! function body can never see the caller's locals.

mod builder;
mod domain;
mod expr;
mod function_call;
mod matching;
mod method_dispatch;
mod pipe_eval;
mod scope_guard;
mod stmt;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use std::rc::Rc;

use rustc_hash::FxHashMap;

use mol_ir::ast::{Program, Stmt};
use mol_ir::{Name, StringInterner};

use crate::callable::HostContext;
use crate::config::InterpreterConfig;
use crate::environment::{Environment, LocalScope, Scope};
use crate::errors::{EvalError, EvalResult};
use crate::print_handler::Channels;
use crate::security::SecurityContext;
use crate::value::record::VectorStore;
use crate::value::{Record, Value};

/// How control left a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Fell through to the next statement.
    Normal,
    /// A `return` is unwinding to the nearest function call.
    Return(Value),
}

/// A `listen` body and the scope it was registered in.
#[derive(Clone)]
struct Listener {
    body: Rc<[Stmt]>,
    scope: LocalScope<Scope>,
}

/// The MOL interpreter.
///
/// Build one with [`InterpreterBuilder`]; the standard library is bound into
/// the global scope at that point. One interpreter runs one program; no
/// state is shared between interpreters.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) env: Environment,
    channels: Channels,
    config: InterpreterConfig,
    security: SecurityContext,
    listeners: FxHashMap<String, Vec<Listener>>,
    /// Vector stores created by `store`, by name.
    stores: FxHashMap<String, Value>,
    next_record_id: u32,
    /// Names of the user functions currently executing, innermost last.
    call_stack: Vec<Rc<str>>,
    trace_enabled: bool,
    colors: bool,
}

impl<'a> Interpreter<'a> {
    /// Execute a whole program in the global scope.
    ///
    /// A top-level `return` ends the program successfully.
    pub fn run_program(&mut self, program: &Program) -> Result<(), EvalError> {
        tracing::debug!(statements = program.statements.len(), "running program");
        self.exec_block(&program.statements)?;
        Ok(())
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    pub fn security(&self) -> &SecurityContext {
        &self.security
    }

    pub fn security_mut(&mut self) -> &mut SecurityContext {
        &mut self.security
    }

    /// Look up a variable as the program would see it at this point.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.lookup(self.interner.intern(name))
    }

    /// Execute statements in the current scope, stopping at a `return`.
    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow, EvalError> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute statements in a new child scope.
    pub(crate) fn exec_scoped_block(&mut self, stmts: &[Stmt]) -> Result<Flow, EvalError> {
        self.with_env_scope(|scoped| scoped.exec_block(stmts))
    }

    #[inline]
    fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn print(&self, line: &str) {
        self.channels.program.write_line(line);
    }

    fn call_stack_names(&self) -> Vec<String> {
        self.call_stack.iter().map(ToString::to_string).collect()
    }

    /// Declared-type check for typed `let` and typed parameters.
    fn check_declared_type(
        &self,
        value: &Value,
        ty: Name,
        binding: Name,
    ) -> Result<(), EvalError> {
        let expected = self.name_str(ty);
        if value.matches_type(expected) == Some(false) {
            return Err(crate::errors::type_annotation_mismatch(
                self.name_str(binding),
                expected,
                value.type_name(),
            ));
        }
        Ok(())
    }
}

impl HostContext for Interpreter<'_> {
    fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        self.invoke(callee, args)
    }

    fn print_line(&mut self, line: &str) {
        self.print(line);
    }

    fn next_record_id(&mut self) -> u32 {
        self.next_record_id += 1;
        self.next_record_id
    }

    fn named_store(&mut self, name: &str) -> Value {
        if let Some(store) = self.stores.get(name) {
            return store.clone();
        }
        let id = self.next_record_id();
        let store = Value::Record(Record::vector_store(VectorStore::new(id, name.to_string())));
        self.stores.insert(name.to_string(), store.clone());
        store
    }

    fn find_store(&self, name: &str) -> Option<Value> {
        self.stores.get(name).cloned()
    }
}
