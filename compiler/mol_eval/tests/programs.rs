//! Whole-program tests through `run_source`.
//!
//! Each test runs MOL source with buffered channels and checks what the
//! program printed, what the pipe tracer reported and how the run ended.

use mol_diagnostic::ColorMode;
use mol_eval::{run_source, ExitStatus, Output, RunOptions};
use pretty_assertions::assert_eq;

fn options() -> RunOptions {
    RunOptions {
        trace_enabled: true,
        color: ColorMode::Never,
    }
}

fn run(source: &str) -> (ExitStatus, Output) {
    run_source(source, options())
}

/// Program output of a run that must succeed.
fn output_of(source: &str) -> String {
    let (status, output) = run(source);
    assert_eq!(output.error, None, "unexpected failure");
    assert_eq!(status, ExitStatus::Success);
    output.program
}

/// Error text of a run that must fail.
fn failure_of(source: &str) -> String {
    let (status, output) = run(source);
    assert_eq!(status, ExitStatus::Failure);
    match output.error {
        Some(error) => error,
        None => panic!("run succeeded with output:\n{}", output.program),
    }
}

fn trace_lines(output: &Output) -> Vec<&str> {
    output.trace.lines().collect()
}

// Pipes

#[test]
fn test_pipe_matches_nested_calls() {
    let prelude = "\
define double(x)
  return x * 2
end
define add_ten(x)
  return x + 10
end
";
    let chains = [
        ("show 3", "show 3"),
        ("show 3 |> double", "show double(3)"),
        ("show 3 |> double |> add_ten", "show add_ten(double(3))"),
        (
            "show 3 |> double |> add_ten |> double",
            "show double(add_ten(double(3)))",
        ),
        (
            "show \"a b\" |> split(\" \") |> join(\"-\")",
            "show join(split(\"a b\", \" \"), \"-\")",
        ),
    ];
    for (piped, nested) in chains {
        let piped = output_of(&format!("{prelude}{piped}"));
        let nested = output_of(&format!("{prelude}{nested}"));
        assert_eq!(piped, nested);
    }
}

#[test]
fn test_pipe_and_nested_calls_raise_the_same_error() {
    let prelude = "define boom(x)\n  return x / 0\nend\n";
    let piped = failure_of(&format!("{prelude}show 1 |> boom |> abs"));
    let nested = failure_of(&format!("{prelude}show abs(boom(1))"));
    assert_eq!(piped, nested);
    assert_eq!(piped, "RuntimeError: division by zero");
}

#[test]
fn test_two_stage_chain_is_not_traced() {
    let (status, output) = run("show \"  hi  \" |> trim |> upper");
    assert!(status.is_success());
    assert_eq!(output.program, "HI\n");
    assert_eq!(output.trace, "");
}

#[test]
fn test_three_stage_chain_reports_four_entries() {
    let (status, output) = run("show \"  Hello World  \" |> trim |> upper |> split(\" \")");
    assert!(status.is_success());
    assert_eq!(output.program, "[\"HELLO\", \"WORLD\"]\n");

    let lines = trace_lines(&output);
    // Header, seed, three stages, footer.
    assert_eq!(lines.len(), 6);
    assert!(lines[0].contains("Pipeline Trace"));
    assert!(lines[1].contains("0."));
    assert!(lines[2].contains("trim"));
    assert!(lines[3].contains("upper"));
    assert!(lines[4].contains("split(..)"));
    assert!(lines[5].contains("3 steps"));
}

#[test]
fn test_trace_disabled_suppresses_reports() {
    let options = RunOptions {
        trace_enabled: false,
        color: ColorMode::Never,
    };
    let (status, output) = run_source("show 1 |> abs |> abs |> abs |> abs", options);
    assert!(status.is_success());
    assert_eq!(output.program, "1\n");
    assert_eq!(output.trace, "");
}

#[test]
fn test_trace_never_coloured_when_disabled() {
    let (_, output) = run("show 1 |> abs |> abs |> abs");
    assert!(!output.trace.contains('\u{1b}'));
}

#[test]
fn test_user_function_pipeline() {
    let source = "\
define double(x)
  return x * 2
end
define add_ten(x)
  return x + 10
end
show 5 |> double |> add_ten |> double";
    let (status, output) = run(source);
    assert!(status.is_success());
    assert_eq!(output.program, "40\n");
    assert_eq!(trace_lines(&output).len(), 6);
}

// Closures

#[test]
fn test_returned_function_keeps_its_scope() {
    let source = "\
define adder(n)
  define inner(x)
    return x + n
  end
  return inner
end
let add5 be adder(5)
let n be 100
show add5(10)
let add1 be adder(1)
show add5(10)
show add1(10)";
    assert_eq!(output_of(source), "15\n15\n11\n");
}

#[test]
fn test_closure_on_one_line_with_semicolons() {
    let source = "define adder(n) define inner(x) return x + n end; return inner end; \
let add5 be adder(5); show add5(10);";
    assert_eq!(output_of(source), "15\n");
}

// Loops

#[test]
fn test_infinite_loop_stops_at_the_cap() {
    let source = "\
let i be 0
try
  while true do
    set i to i + 1
  end
rescue e
  show e
end
show i";
    assert_eq!(
        output_of(source),
        "RuntimeError: infinite loop detected (exceeded 1,000,000 iterations)\n1000000\n"
    );
}

#[test]
fn test_infinite_loop_fails_the_run() {
    let error = failure_of("let i be 0\nwhile true do\n  set i to i + 1\nend");
    assert_eq!(
        error,
        "RuntimeError: infinite loop detected (exceeded 1,000,000 iterations)"
    );
}

// Truthiness

#[test]
fn test_truthiness() {
    let falsy = ["null", "false", "0", "\"\"", "[]"];
    let truthy = ["true", "1", "-2", "0.5", "\"a\"", "[0]", "{}", "{a: 1}"];

    for value in falsy {
        let source = format!("if {value} then\n  show \"yes\"\nelse\n  show \"no\"\nend");
        assert_eq!(output_of(&source), "no\n", "{value} should be falsy");
    }
    for value in truthy {
        let source = format!("if {value} then\n  show \"yes\"\nend");
        assert_eq!(output_of(&source), "yes\n", "{value} should be truthy");
    }
}

// Guards

#[test]
fn test_guard() {
    assert_eq!(failure_of("guard false : \"msg\""), "GuardError: msg");
    assert_eq!(failure_of("guard 3 > 5 : \"too small\""), "GuardError: too small");
    assert_eq!(output_of("guard true\nshow \"after\""), "after\n");
}

// Scope isolation

#[test]
fn test_block_locals_do_not_leak() {
    let blocks = [
        "if true then\n  let inner be 1\nend",
        "let go be true\nwhile go do\n  let inner be 1\n  set go to false\nend",
        "for x in [1] do\n  let inner be x\nend",
    ];
    for block in blocks {
        let error = failure_of(&format!("{block}\nshow inner"));
        assert_eq!(error, "RuntimeError: undefined variable: 'inner'");
    }
}

#[test]
fn test_blocks_mutate_enclosing_bindings() {
    let source = "\
let total be 0
for x in [1, 2, 3] do
  set total to total + x
end
if true then
  set total to total * 2
end
show total";
    assert_eq!(output_of(source), "12\n");
}

// Whole runs

#[test]
fn test_syntax_error_fails_before_running() {
    let (status, output) = run("show 1\nlet be");
    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(status.code(), 1);
    assert_eq!(output.program, "");
    let error = output.error.unwrap_or_default();
    assert!(error.starts_with("SyntaxError:"), "got {error}");
}

#[test]
fn test_output_before_failure_is_kept() {
    let (status, output) = run("show \"first\"\nshow missing\nshow \"never\"");
    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(output.program, "first\n");
    assert_eq!(
        output.error.as_deref(),
        Some("RuntimeError: undefined variable: 'missing'")
    );
}

#[test]
fn test_rag_pipeline() {
    let source = "\
let doc be Document(\"notes.txt\", \"rust keeps memory safe. pipes keep code flat.\")
doc |> chunk(4) |> store(\"kb\")
let hits be retrieve(\"memory safe\", \"kb\", 1)
show len(hits)
show hits[0].text";
    let output = output_of(source);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "1");
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_success_exit_code() {
    let (status, _) = run("show 1");
    assert_eq!(status.code(), 0);
}
