//! Whole-program entry points.

use mol_ir::ast::Program;
use mol_ir::StringInterner;

use crate::config::RunOptions;
use crate::errors::EvalError;
use crate::interpreter::InterpreterBuilder;
use crate::print_handler::Channels;

/// How a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }

    /// Process exit code.
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

/// Result of [`run`]. `error` is set exactly when the run failed.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: ExitStatus,
    pub error: Option<EvalError>,
}

/// Execute a parsed program, writing program output and pipe traces to
/// `channels`. Trace colours follow `options.color`, with the trace
/// channel's terminal status deciding `auto`.
pub fn run(
    program: &Program,
    interner: &StringInterner,
    options: RunOptions,
    channels: Channels,
) -> RunOutcome {
    let colors = options.color.should_use_colors(channels.trace.is_terminal());
    let mut interpreter = InterpreterBuilder::new(interner)
        .channels(channels)
        .trace_enabled(options.trace_enabled)
        .colors(colors)
        .build();

    match interpreter.run_program(program) {
        Ok(()) => RunOutcome {
            status: ExitStatus::Success,
            error: None,
        },
        Err(error) => {
            tracing::debug!(%error, "program failed");
            RunOutcome {
                status: ExitStatus::Failure,
                error: Some(error),
            }
        }
    }
}

/// Everything a buffered run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    /// Lines written by `show`, `display` and the domain statements.
    pub program: String,
    /// Pipe trace reports.
    pub trace: String,
    /// The failure, as `Kind: message`.
    pub error: Option<String>,
}

/// Lex, parse and run `source` with both channels buffered. A syntax error
/// fails the run before anything executes.
pub fn run_source(source: &str, options: RunOptions) -> (ExitStatus, Output) {
    let interner = StringInterner::new();
    let program = match mol_parse::parse_source(source, &interner) {
        Ok(program) => program,
        Err(error) => {
            let output = Output {
                error: Some(error.to_string()),
                ..Output::default()
            };
            return (ExitStatus::Failure, output);
        }
    };

    let channels = Channels::buffered();
    let outcome = run(&program, &interner, options, channels.clone());
    let output = Output {
        program: channels.program.contents(),
        trace: channels.trace.contents(),
        error: outcome.error.map(|e| e.to_string()),
    };
    (outcome.status, output)
}
