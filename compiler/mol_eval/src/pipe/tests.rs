use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;
use mol_ir::ast::Program;
use mol_ir::ast::StmtKind;

fn stages_of(source: &str, interner: &StringInterner) -> Vec<Expr> {
    let program: Program = match mol_parse::parse_source(source, interner) {
        Ok(program) => program,
        Err(err) => panic!("parse failed: {err}"),
    };
    match program.statements.into_iter().next().map(|s| s.kind) {
        Some(StmtKind::Expr(Expr {
            kind: ExprKind::Pipe { stages, .. },
            ..
        })) => stages,
        other => panic!("expected a pipe expression, got {other:?}"),
    }
}

#[test]
fn test_threshold() {
    assert!(!should_trace(0, true));
    assert!(!should_trace(2, true));
    assert!(should_trace(3, true));
    assert!(should_trace(10, true));
    assert!(!should_trace(3, false));
}

#[test]
fn test_stage_labels() {
    let interner = StringInterner::new();
    let stages = stages_of(
        "\"x\" |> trim |> split(\",\") |> join(\"-\", 2) |> upper() |> xs.push() |> fn(v) -> v",
        &interner,
    );
    let labels: Vec<String> = stages.iter().map(|s| stage_label(s, &interner)).collect();
    assert_eq!(
        labels,
        vec!["trim", "split(..)", "join(.., ..)", "upper", ".push()", "fn(..)"]
    );
}

#[test]
fn test_entries_are_numbered_from_seed() {
    let mut trace = PipeTrace::with_stages(2);
    trace.record_seed("Text(\"a\")".into());
    trace.record_stage("upper".into(), Duration::from_micros(10), "Text(\"A\")".into());
    trace.record_stage("len".into(), Duration::from_micros(5), "Number(1)".into());
    let steps: Vec<usize> = trace.entries().iter().map(|e| e.step).collect();
    assert_eq!(steps, vec![0, 1, 2]);
    assert_eq!(trace.stage_count(), 2);
    assert_eq!(trace.entries()[0].label, "input");
    assert_eq!(trace.entries()[0].elapsed, None);
}

#[test]
fn test_render_plain() {
    let mut trace = PipeTrace::with_stages(1);
    trace.record_seed("Number(2)".into());
    trace.record_stage("double".into(), Duration::from_micros(1500), "Number(4)".into());
    trace.finish(Duration::from_micros(2000));

    let rendered = trace.render(false);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], format!("  ┌─ Pipeline Trace {}", "─".repeat(38)));
    assert_eq!(
        lines[1],
        "  │ 0.  input                   ─  Number(2)"
    );
    assert_eq!(
        lines[2],
        "  │ 1.  double              1.5ms  → Number(4)"
    );
    assert_eq!(
        lines[3],
        format!("  └─ 1 steps · 2.0ms total {}", "─".repeat(27))
    );
}

#[test]
fn test_render_colored_wraps_parts() {
    let mut trace = PipeTrace::with_stages(0);
    trace.record_seed("null".into());
    let rendered = trace.render(true);
    assert!(rendered.starts_with("  \x1b[36m┌─ Pipeline Trace"));
    assert!(rendered.contains("\x1b[33minput"));
    assert!(!trace.render(false).contains('\x1b'));
}
