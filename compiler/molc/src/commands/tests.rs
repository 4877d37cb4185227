#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_run_args_defaults() {
    let parsed = parse_run_args(&args(&["main.mol"]), false).unwrap();
    assert_eq!(parsed.path, "main.mol");
    assert_eq!(parsed.options, RunOptions::default());
}

#[test]
fn test_run_args_flags_in_any_position() {
    let parsed = parse_run_args(&args(&["--no-trace", "main.mol", "--color=always"]), false).unwrap();
    assert_eq!(parsed.path, "main.mol");
    assert!(!parsed.options.trace_enabled);
    assert_eq!(parsed.options.color, ColorMode::Always);

    let parsed = parse_run_args(&args(&["main.mol", "--no-trace", "--trace"]), false).unwrap();
    assert!(parsed.options.trace_enabled);
}

#[test]
fn test_no_color_wins() {
    let parsed = parse_run_args(&args(&["main.mol", "--color=always"]), true).unwrap();
    assert_eq!(parsed.options.color, ColorMode::Never);
}

#[test]
fn test_run_args_errors() {
    assert_eq!(
        parse_run_args(&args(&["--no-trace"]), false),
        Err(ArgsError::MissingPath)
    );
    assert_eq!(
        parse_run_args(&args(&["main.mol", "--fast"]), false),
        Err(ArgsError::UnknownOption("--fast".to_string()))
    );
    assert_eq!(
        parse_run_args(&args(&["main.mol", "--color=rainbow"]), false),
        Err(ArgsError::InvalidColor("rainbow".to_string()))
    );
}

#[test]
fn test_run_error_diagnostics() {
    let interner = mol_ir::StringInterner::new();
    let syntax = mol_parse::parse_source("let be", &interner).unwrap_err();
    let err = RunError::from(syntax);
    assert!(err.to_string().starts_with("SyntaxError:"));
    assert!(err.to_diagnostic().unwrap().is_error());

    let err = RunError::from(mol_eval::errors::division_by_zero());
    assert_eq!(err.to_string(), "RuntimeError: division by zero");
    assert!(err.to_diagnostic().is_some());

    let err = read_file("/definitely/not/here.mol").unwrap_err();
    assert!(err.to_string().starts_with("cannot read '/definitely/not/here.mol'"));
    assert!(err.to_diagnostic().is_none());
}

#[test]
fn test_missing_file_fails() {
    let status = run_file("/definitely/not/here.mol", RunOptions::default());
    assert_eq!(status, ExitStatus::Failure);
}
