//! RAII-style scope guards for Interpreter environment management.
//!
//! [`ScopedInterpreter`] pops the scope it pushed when dropped, so every
//! early return through `?` leaves the scope stack balanced. Function calls
//! swap in a whole new frame with [`Interpreter::with_frame`].

use std::ops::{Deref, DerefMut};

use mol_ir::Name;

use super::Interpreter;
use crate::environment::{LocalScope, Scope};
use crate::value::Value;

/// Guard over an interpreter with one extra scope pushed.
///
/// Access the interpreter through this guard; it implements `Deref` and
/// `DerefMut`. Dropping the guard pops the scope.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope that is popped when the returned guard is dropped.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a new child scope.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` in a new scope holding `bindings`.
    pub fn with_bindings<T, F, I>(&mut self, bindings: I, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
        I: IntoIterator<Item = (Name, Value)>,
    {
        self.with_env_scope(|scoped| {
            for (name, value) in bindings {
                scoped.env.define(name, value);
            }
            f(scoped)
        })
    }

    /// Run `f` in a new scope with a single binding, as a loop body does.
    pub fn with_binding<T, F>(&mut self, name: Name, value: Value, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        self.with_env_scope(|scoped| {
            scoped.env.define(name, value);
            f(scoped)
        })
    }

    /// Run `f` in a fresh frame whose base scope is a child of `parent`,
    /// then restore the caller's environment.
    pub(crate) fn with_frame<T, F>(&mut self, parent: &LocalScope<Scope>, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let frame = self.env.frame(parent);
        let caller = std::mem::replace(&mut self.env, frame);
        let result = f(self);
        self.env = caller;
        result
    }
}
