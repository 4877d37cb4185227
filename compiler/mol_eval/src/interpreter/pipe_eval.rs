//! Pipe chain evaluation.
//!
//! `seed |> f(a) |> g` is `g(f(seed, a))`: each stage is called with the
//! previous value prepended to its own arguments. Chains long enough to be
//! traced are timed stage by stage and reported on the trace channel once
//! the last stage has finished.

use std::time::Instant;

use mol_ir::ast::{Expr, ExprKind};

use super::Interpreter;
use crate::errors::EvalResult;
use crate::pipe::{should_trace, stage_label, PipeTrace};
use crate::value::Value;

impl Interpreter<'_> {
    pub(super) fn eval_pipe(&mut self, seed: &Expr, stages: &[Expr]) -> EvalResult {
        let traced = should_trace(stages.len(), self.trace_enabled);
        tracing::debug!(stages = stages.len(), traced, "pipe chain");

        if !traced {
            let mut value = self.eval(seed)?;
            for stage in stages {
                value = self.eval_pipe_stage(stage, value)?;
            }
            return Ok(value);
        }

        let mut trace = PipeTrace::with_stages(stages.len());
        let mut value = self.eval(seed)?;
        trace.record_seed(value.describe());

        let chain_start = Instant::now();
        for stage in stages {
            let stage_start = Instant::now();
            value = self.eval_pipe_stage(stage, value)?;
            trace.record_stage(
                stage_label(stage, self.interner),
                stage_start.elapsed(),
                value.describe(),
            );
        }
        trace.finish(chain_start.elapsed());

        self.channels.trace.write_block(&trace.render(self.colors));
        Ok(value)
    }

    /// Feed `piped` into one stage.
    fn eval_pipe_stage(&mut self, stage: &Expr, piped: Value) -> EvalResult {
        let result = match &stage.kind {
            ExprKind::Call { callee, args } if matches!(callee.kind, ExprKind::Var(_)) => {
                let function = self.eval(callee)?;
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(piped);
                full.extend(self.eval_args(args)?);
                self.invoke_named(&function, full, callee)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval(receiver)?;
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(piped);
                full.extend(self.eval_args(args)?);
                self.call_method(receiver, *method, full)
            }
            _ => {
                let function = self.eval(stage)?;
                self.invoke_named(&function, vec![piped], stage)
            }
        };
        result.map_err(|e| e.with_span(stage.span))
    }
}
