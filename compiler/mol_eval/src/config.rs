//! Run configuration.

use mol_diagnostic::ColorMode;

use crate::security::DEFAULT_RESOURCES;

/// Loop bodies a single `while` or `for` may run before it is stopped.
pub const MAX_LOOP_ITERATIONS: usize = 1_000_000;

/// Nested user function calls allowed before the run fails.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Options chosen by whoever starts a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// When false, no pipe chain is traced. It never enables tracing for
    /// chains below the stage threshold.
    pub trace_enabled: bool,
    /// Colouring of trace reports.
    pub color: ColorMode,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            trace_enabled: true,
            color: ColorMode::Auto,
        }
    }
}

/// Limits and policy for one interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub max_loop_iterations: usize,
    pub max_call_depth: usize,
    /// Resources `access` may open.
    pub allowed_resources: Vec<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_loop_iterations: MAX_LOOP_ITERATIONS,
            max_call_depth: MAX_CALL_DEPTH,
            allowed_resources: DEFAULT_RESOURCES.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}
