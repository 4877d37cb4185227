//! Diagnostic system for MOL error reporting.
//!
//! Every phase reports failures as a [`Diagnostic`]:
//! - an error code for searchability
//! - a message saying what went wrong
//! - a primary label saying where
//! - optional notes and suggestions

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
pub use error_code::ErrorCode;
