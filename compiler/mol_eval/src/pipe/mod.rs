//! Pipe trace capture and rendering.
//!
//! A chain `seed |> s1 |> .. |> sn` is traced when it has at least
//! [`TRACE_THRESHOLD`] stages after the seed and tracing is enabled. The
//! evaluator decides that before running the first stage; an untraced chain
//! never allocates a [`PipeTrace`] or reads the clock.

use std::fmt::Write;
use std::time::Duration;

use mol_ir::ast::{Expr, ExprKind};
use mol_ir::StringInterner;

/// Minimum number of stages (excluding the seed) for a chain to be traced.
pub const TRACE_THRESHOLD: usize = 3;

/// Label of the seed entry.
pub const SEED_LABEL: &str = "input";

/// Whether a chain with `stage_count` stages is traced.
///
/// `enabled` can only suppress tracing; it never forces a short chain.
#[inline]
pub fn should_trace(stage_count: usize, enabled: bool) -> bool {
    enabled && stage_count >= TRACE_THRESHOLD
}

/// One line of a trace report.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    pub step: usize,
    pub label: String,
    /// `None` for the seed.
    pub elapsed: Option<Duration>,
    pub description: String,
}

/// Entries captured while evaluating one traced chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipeTrace {
    entries: Vec<TraceEntry>,
    total: Duration,
}

impl PipeTrace {
    pub fn with_stages(stage_count: usize) -> Self {
        PipeTrace {
            entries: Vec::with_capacity(stage_count + 1),
            total: Duration::ZERO,
        }
    }

    pub fn record_seed(&mut self, description: String) {
        self.entries.push(TraceEntry {
            step: 0,
            label: SEED_LABEL.to_string(),
            elapsed: None,
            description,
        });
    }

    pub fn record_stage(&mut self, label: String, elapsed: Duration, description: String) {
        self.entries.push(TraceEntry {
            step: self.entries.len(),
            label,
            elapsed: Some(elapsed),
            description,
        });
    }

    /// Wall-clock time of the whole chain, seed included.
    pub fn finish(&mut self, total: Duration) {
        self.total = total;
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Number of stages, excluding the seed.
    pub fn stage_count(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Render the boxed report, one entry per line.
    pub fn render(&self, colors: bool) -> String {
        let p = Palette::new(colors);
        let mut out = String::new();
        let _ = writeln!(
            out,
            "  {}┌─ Pipeline Trace {}{}",
            p.border,
            "─".repeat(38),
            p.reset
        );
        for entry in &self.entries {
            let _ = write!(
                out,
                "  {}│{} {}{}.{}  {}{:<16}{} ",
                p.border, p.reset, p.dim, entry.step, p.reset, p.label, entry.label, p.reset
            );
            let _ = match entry.elapsed {
                None => writeln!(out, "{}{:>8}{}  {}", p.dim, "─", p.reset, entry.description),
                Some(elapsed) => writeln!(
                    out,
                    "{}{:>6.1}ms{}  {}→{} {}",
                    p.dim,
                    millis(elapsed),
                    p.reset,
                    p.arrow,
                    p.reset,
                    entry.description
                ),
            };
        }
        let _ = writeln!(
            out,
            "  {}└─ {} steps · {:.1}ms total {}{}",
            p.border,
            self.stage_count(),
            millis(self.total),
            "─".repeat(27),
            p.reset
        );
        out
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

struct Palette {
    border: &'static str,
    dim: &'static str,
    label: &'static str,
    arrow: &'static str,
    reset: &'static str,
}

impl Palette {
    fn new(colors: bool) -> Self {
        if colors {
            Palette {
                border: "\x1b[36m",
                dim: "\x1b[90m",
                label: "\x1b[33m",
                arrow: "\x1b[32m",
                reset: "\x1b[0m",
            }
        } else {
            Palette {
                border: "",
                dim: "",
                label: "",
                arrow: "",
                reset: "",
            }
        }
    }
}

/// Short source label for a stage: `trim`, `split(..)`, `.push()`, `fn(..)`.
pub fn stage_label(stage: &Expr, interner: &StringInterner) -> String {
    match &stage.kind {
        ExprKind::Var(name) => interner.lookup(*name).to_string(),
        ExprKind::Call { callee, args } => match &callee.kind {
            ExprKind::Var(name) if args.is_empty() => interner.lookup(*name).to_string(),
            ExprKind::Var(name) => {
                let holes = vec![".."; args.len()].join(", ");
                format!("{}({holes})", interner.lookup(*name))
            }
            _ => "expr".to_string(),
        },
        ExprKind::MethodCall { method, .. } => format!(".{}()", interner.lookup(*method)),
        ExprKind::Lambda(_) => "fn(..)".to_string(),
        _ => "expr".to_string(),
    }
}

#[cfg(test)]
mod tests;
