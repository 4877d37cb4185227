//! Domain statements: events, links and record updates.
//!
//! Each statement announces itself on the program-output channel with a
//! `[MOL]` line after it has taken effect.

use std::rc::Rc;

use mol_ir::ast::{Expr, Stmt};

use super::{Interpreter, Listener};
use crate::errors::{recursion_limit_exceeded, EvalError};
use crate::value::{Record, Value};

impl Interpreter<'_> {
    /// Announce the event, then run every listener registered for it, each
    /// in a child of the scope it was registered in.
    pub(super) fn exec_trigger(&mut self, event: &Expr) -> Result<(), EvalError> {
        let event = self.eval(event)?.to_string();
        self.print(&format!("[MOL] ⚡ Triggered: {event}"));

        let listeners = self.listeners.get(&event).cloned().unwrap_or_default();
        tracing::debug!(event, listeners = listeners.len(), "trigger");
        if listeners.is_empty() {
            return Ok(());
        }

        // Listener bodies count against the call-depth limit.
        let frame: Rc<str> = Rc::from(format!("listen {event}"));
        let limit = self.config.max_call_depth;
        for listener in listeners {
            if self.call_stack.len() >= limit {
                return Err(recursion_limit_exceeded(limit));
            }
            self.call_stack.push(Rc::clone(&frame));
            let result = self.with_frame(&listener.scope, |interp| interp.exec_block(&listener.body));
            self.call_stack.pop();
            result?;
        }
        Ok(())
    }

    pub(super) fn exec_listen(&mut self, event: &Expr, body: &Rc<[Stmt]>) -> Result<(), EvalError> {
        let event = self.eval(event)?.to_string();
        self.print(&format!("[MOL] 👂 Listening for: {event}"));
        let listener = Listener {
            body: Rc::clone(body),
            scope: self.env.current_scope(),
        };
        self.listeners.entry(event).or_default().push(listener);
        Ok(())
    }

    /// Node to Node connects, Thought to Thought links; anything else is
    /// only announced.
    pub(super) fn exec_link(&mut self, source: &Expr, target: &Expr) -> Result<(), EvalError> {
        let source = self.eval(source)?;
        let target = self.eval(target)?;
        match (&source, &target) {
            (Value::Record(s @ Record::Node(_)), Value::Record(Record::Node(_))) => {
                s.call_method("connect", std::slice::from_ref(&target))?;
            }
            (Value::Record(s @ Record::Thought(_)), Value::Record(Record::Thought(_))) => {
                s.call_method("link", std::slice::from_ref(&target))?;
            }
            _ => {}
        }
        self.print(&format!("[MOL] 🔗 Linked: {source} → {target}"));
        Ok(())
    }

    /// Activates a Node, adding a numeric `with` value to its weight.
    pub(super) fn exec_process(
        &mut self,
        target: &Expr,
        with: Option<&Expr>,
    ) -> Result<(), EvalError> {
        let target = self.eval(target)?;
        let with = match with {
            Some(expr) => Some(self.eval(expr)?),
            None => None,
        };

        let line = if let Value::Record(Record::Node(node)) = &target {
            {
                let mut node = node.borrow_mut();
                node.active = true;
                if let Some(Value::Number(extra)) = with {
                    node.weight += extra;
                }
            }
            format!("[MOL] ⚙️  Processed: {target}")
        } else {
            match &with {
                Some(with) => format!("[MOL] ⚙️  Processed: {target} with {with}"),
                None => format!("[MOL] ⚙️  Processed: {target}"),
            }
        };
        self.print(&line);
        Ok(())
    }

    pub(super) fn exec_access(&mut self, resource: &Expr) -> Result<(), EvalError> {
        let resource = self.eval(resource)?.to_string();
        self.security.check_access(&resource)?;
        self.print(&format!("[MOL] 🔓 Access granted: {resource}"));
        Ok(())
    }

    pub(super) fn exec_sync(&mut self, stream: &Expr) -> Result<(), EvalError> {
        let stream = self.eval(stream)?;
        if let Value::Record(record @ Record::Stream(_)) = &stream {
            record.call_method("sync", &[])?;
        }
        self.print(&format!("[MOL] 🔄 Synced: {stream}"));
        Ok(())
    }

    pub(super) fn exec_evolve(&mut self, node: &Expr) -> Result<(), EvalError> {
        let node = self.eval(node)?;
        if let Value::Record(record @ Record::Node(_)) = &node {
            record.call_method("evolve", &[])?;
        }
        self.print(&format!("[MOL] 🧬 Evolved: {node}"));
        Ok(())
    }

    pub(super) fn exec_emit(&mut self, data: &Expr) -> Result<(), EvalError> {
        let data = self.eval(data)?;
        self.print(&format!("[MOL] 📡 Emitted: {data}"));
        Ok(())
    }
}
