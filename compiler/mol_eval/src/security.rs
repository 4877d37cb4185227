//! Resource allow-list for `access` statements.

use std::collections::BTreeSet;

use crate::errors::{access_denied, EvalError};

/// Resources a program may `access` unless the embedder says otherwise.
pub const DEFAULT_RESOURCES: &[&str] = &[
    "mind_core",
    "memory_bank",
    "node_graph",
    "data_stream",
    "thought_pool",
];

/// One access attempt, granted or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessRecord {
    pub resource: String,
    pub granted: bool,
}

/// Allow-list checked by `access`, with a log of every attempt.
#[derive(Clone, Debug)]
pub struct SecurityContext {
    allowed: BTreeSet<String>,
    log: Vec<AccessRecord>,
}

impl SecurityContext {
    pub fn new<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SecurityContext {
            allowed: resources.into_iter().map(Into::into).collect(),
            log: Vec::new(),
        }
    }

    /// Record the attempt and fail with a SecurityError if `resource` is
    /// not allowed.
    pub fn check_access(&mut self, resource: &str) -> Result<(), EvalError> {
        let granted = self.allowed.contains(resource);
        self.log.push(AccessRecord {
            resource: resource.to_string(),
            granted,
        });
        if granted {
            tracing::debug!(resource, "access granted");
            return Ok(());
        }
        tracing::debug!(resource, "access denied");
        let allowed: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        Err(access_denied(resource, &allowed.join(", ")))
    }

    pub fn grant(&mut self, resource: impl Into<String>) {
        self.allowed.insert(resource.into());
    }

    pub fn revoke(&mut self, resource: &str) {
        self.allowed.remove(resource);
    }

    pub fn log(&self) -> &[AccessRecord] {
        &self.log
    }
}

impl Default for SecurityContext {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCES.iter().copied())
    }
}
