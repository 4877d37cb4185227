//! CLI command implementations.

mod debug;
mod run;

use std::io::{self, IsTerminal};

use mol_diagnostic::{ColorMode, Diagnostic, DiagnosticEmitter, TerminalEmitter};
use mol_eval::{EvalError, ExitStatus, RunOptions};
use mol_parse::SyntaxError;

pub use debug::{lex_file, parse_file};
pub use run::run_file;

/// Why a command failed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl RunError {
    /// Source-anchored rendering, for failures that have a position.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            RunError::Io { .. } => None,
            RunError::Syntax(err) => Some(err.to_diagnostic()),
            RunError::Eval(err) => Some(err.to_diagnostic()),
        }
    }
}

/// A malformed command line.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("missing file path")]
    MissingPath,
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("invalid colour mode '{0}' (expected auto, always or never)")]
    InvalidColor(String),
}

/// Arguments of `mol run`.
#[derive(Debug, PartialEq, Eq)]
pub struct RunArgs {
    pub path: String,
    pub options: RunOptions,
}

/// Parse the arguments after `run`. Flags may come before or after the
/// path. `no_color` reflects `NO_COLOR` and wins over `--color`.
pub fn parse_run_args(args: &[String], no_color: bool) -> Result<RunArgs, ArgsError> {
    let mut path = None;
    let mut options = RunOptions::default();

    for arg in args {
        if arg == "--trace" {
            options.trace_enabled = true;
        } else if arg == "--no-trace" {
            options.trace_enabled = false;
        } else if let Some(mode) = arg.strip_prefix("--color=") {
            options.color =
                ColorMode::from_flag(mode).ok_or_else(|| ArgsError::InvalidColor(mode.to_string()))?;
        } else if arg.starts_with('-') {
            return Err(ArgsError::UnknownOption(arg.clone()));
        } else if path.is_none() {
            path = Some(arg.clone());
        }
    }

    if no_color {
        options.color = ColorMode::Never;
    }
    let path = path.ok_or(ArgsError::MissingPath)?;
    Ok(RunArgs { path, options })
}

fn read_file(path: &str) -> Result<String, RunError> {
    std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_string(),
        source,
    })
}

/// Read `path`, hand its text to `action`, and report any failure on
/// stderr against that text.
fn with_source_file(
    path: &str,
    color: ColorMode,
    action: impl FnOnce(&str) -> Result<(), RunError>,
) -> ExitStatus {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitStatus::Failure;
        }
    };
    match action(&source) {
        Ok(()) => ExitStatus::Success,
        Err(err) => {
            report(&err, &source, color);
            ExitStatus::Failure
        }
    }
}

fn report(err: &RunError, source: &str, color: ColorMode) {
    tracing::debug!(%err, "command failed");
    let Some(diagnostic) = err.to_diagnostic() else {
        eprintln!("error: {err}");
        return;
    };
    let is_tty = io::stderr().is_terminal();
    let mut emitter =
        TerminalEmitter::with_color_mode(io::stderr(), color, is_tty).with_source(source);
    emitter.emit(&diagnostic);
    emitter.flush();
}

#[cfg(test)]
mod tests;
