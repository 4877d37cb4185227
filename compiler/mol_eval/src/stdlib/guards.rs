//! Pass-through helpers for pipes: printing and assertions. Each returns
//! its first argument unchanged when it succeeds.

use super::optional;
use crate::callable::{HostContext, HostFunction};
use crate::errors::{guard_failed, EvalResult};
use crate::value::{count_as_number, format_number, Record, Value};

pub(super) const FUNCTIONS: &[HostFunction] = &[
    HostFunction::new("display", 1, Some(1), display),
    HostFunction::new("tap", 1, Some(2), tap),
    HostFunction::new("assert_min", 2, Some(2), assert_min),
    HostFunction::new("assert_not_null", 1, Some(1), assert_not_null),
    HostFunction::new("assert_eq", 2, Some(3), assert_eq),
    HostFunction::new("assert_true", 1, Some(2), assert_true),
];

fn display(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    ctx.print_line(&args[0].to_string());
    Ok(args[0].clone())
}

/// Prints `[label] value`.
fn tap(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let label = optional(args, 1).map_or_else(|| "tap".to_string(), ToString::to_string);
    ctx.print_line(&format!("[{label}] {}", args[0]));
    Ok(args[0].clone())
}

/// Checks a number, a thought's confidence, or a collection's size against
/// a minimum.
fn assert_min(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let threshold = args[1].expect_number("assert_min")?;
    let measured = match &args[0] {
        Value::Number(n) => *n,
        Value::Record(Record::Thought(t)) => t.borrow().confidence,
        Value::Text(s) => count_as_number(s.chars().count()),
        Value::List(items) => count_as_number(items.borrow().len()),
        Value::Map(map) => count_as_number(map.borrow().len()),
        _ => 0.0,
    };
    if measured < threshold {
        return Err(guard_failed(format!(
            "Guard: value {} < minimum {}",
            format_number(measured),
            format_number(threshold)
        )));
    }
    Ok(args[0].clone())
}

fn assert_not_null(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    if matches!(args[0], Value::Null) {
        return Err(guard_failed("Guard: value is null"));
    }
    Ok(args[0].clone())
}

fn assert_eq(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let (actual, expected) = (&args[0], &args[1]);
    if actual != expected {
        let message = optional(args, 2).map_or_else(
            || format!("Guard: expected {expected:?}, got {actual:?}"),
            ToString::to_string,
        );
        return Err(guard_failed(message));
    }
    Ok(actual.clone())
}

fn assert_true(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    if !args[0].is_truthy() {
        let message = optional(args, 1)
            .map_or_else(|| "Guard: assertion failed".to_string(), ToString::to_string);
        return Err(guard_failed(message));
    }
    Ok(args[0].clone())
}
