//! The `run` command: parse and evaluate a MOL source file.

use mol_eval::{Channels, ExitStatus, RunOptions};
use mol_ir::StringInterner;

use super::{with_source_file, RunError};

/// Run a MOL source file. Program output goes to stdout; pipe traces and
/// diagnostics go to stderr.
pub fn run_file(path: &str, options: RunOptions) -> ExitStatus {
    tracing::debug!(path, trace = options.trace_enabled, "running file");
    with_source_file(path, options.color, |source| execute(source, options))
}

fn execute(source: &str, options: RunOptions) -> Result<(), RunError> {
    let interner = StringInterner::new();
    let program = mol_parse::parse_source(source, &interner)?;
    let outcome = mol_eval::run(&program, &interner, options, Channels::stdio());
    match outcome.error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
