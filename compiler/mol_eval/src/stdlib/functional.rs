//! Higher-order list functions. Each takes the list first so it reads well
//! as a pipe stage: `xs |> map(fn(x) -> x * 2)`.
//!
//! Callbacks run on a snapshot of the list, so a callback that mutates the
//! list does not disturb the iteration.

use crate::callable::{HostContext, HostFunction};
use crate::errors::{EvalError, EvalResult};
use crate::value::Value;

pub(super) const FUNCTIONS: &[HostFunction] = &[
    HostFunction::new("map", 2, Some(2), map),
    HostFunction::new("filter", 2, Some(2), filter),
    HostFunction::new("reduce", 2, Some(3), reduce),
    HostFunction::new("every", 2, Some(2), every),
    HostFunction::new("some", 2, Some(2), some),
];

fn snapshot(value: &Value, function: &str) -> Result<Vec<Value>, EvalError> {
    Ok(value.expect_list(function)?.borrow().clone())
}

fn map(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = snapshot(&args[0], "map")?;
    let mapped = items
        .into_iter()
        .map(|item| ctx.call_value(&args[1], vec![item]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::list(mapped))
}

fn filter(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let mut kept = Vec::new();
    for item in snapshot(&args[0], "filter")? {
        if ctx.call_value(&args[1], vec![item.clone()])?.is_truthy() {
            kept.push(item);
        }
    }
    Ok(Value::list(kept))
}

/// `reduce(xs, f, initial?)`; without an initial value the first item seeds
/// the accumulator.
fn reduce(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let mut items = snapshot(&args[0], "reduce")?.into_iter();
    let mut acc = match args.get(2) {
        Some(initial) => initial.clone(),
        None => items
            .next()
            .ok_or_else(|| EvalError::new("reduce() of empty list with no initial value"))?,
    };
    for item in items {
        acc = ctx.call_value(&args[1], vec![acc, item])?;
    }
    Ok(acc)
}

fn every(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    for item in snapshot(&args[0], "every")? {
        if !ctx.call_value(&args[1], vec![item])?.is_truthy() {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn some(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    for item in snapshot(&args[0], "some")? {
        if ctx.call_value(&args[1], vec![item])?.is_truthy() {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}
