//! MOL Eval - the evaluator for the MOL pipe language.
//!
//! # Architecture
//!
//! - `Value`: dynamically typed runtime values; lists, maps and domain
//!   records are shared handles
//! - `Environment`: lexical scopes, with frames for function calls
//! - `Callable`: user functions and host functions behind one call contract
//! - `Interpreter`: statements, expressions, pipes and their traces
//! - `Registry`: the standard library, bound into the global scope
//! - `run` / `run_source`: whole-program entry points
//!
//! Program output and trace reports go to separate [`Channels`]; logging
//! through `tracing` never touches either.

pub mod callable;
pub mod config;
mod environment;
pub mod errors;
pub mod interpreter;
mod operators;
pub mod pipe;
pub mod print_handler;
mod run;
pub mod security;
pub mod stdlib;
pub mod value;

pub use callable::{Callable, HostContext, HostFn, HostFunction, UserFunction};
pub use config::{InterpreterConfig, RunOptions, MAX_CALL_DEPTH, MAX_LOOP_ITERATIONS};
pub use environment::{Environment, LocalScope, Scope};
pub use errors::{ErrorCategory, EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Flow, Interpreter, InterpreterBuilder};
pub use operators::{evaluate_binary, evaluate_unary};
pub use pipe::{PipeTrace, TraceEntry};
pub use print_handler::{Channels, OutputSink, SharedSink};
pub use run::{run, run_source, ExitStatus, Output, RunOutcome};
pub use security::SecurityContext;
pub use stdlib::Registry;
pub use value::{MapValue, Record, Value};
