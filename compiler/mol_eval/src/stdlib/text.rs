//! Text functions, plus `slice` which also works on lists.

use super::{optional, slice_bounds, whole};
use crate::callable::{HostContext, HostFunction};
use crate::errors::{wrong_arg_type, EvalError, EvalResult};
use crate::value::Value;

pub(super) const FUNCTIONS: &[HostFunction] = &[
    HostFunction::new("join", 1, Some(2), join),
    HostFunction::new("split", 1, Some(2), split),
    HostFunction::new("upper", 1, Some(1), upper),
    HostFunction::new("lower", 1, Some(1), lower),
    HostFunction::new("trim", 1, Some(1), trim),
    HostFunction::new("replace", 3, Some(3), replace),
    HostFunction::new("slice", 2, Some(3), slice),
];

/// The separator argument at `index`, a single space when absent.
fn separator<'a>(args: &'a [Value], index: usize, function: &str) -> Result<&'a str, EvalError> {
    match optional(args, index) {
        Some(v) => v.expect_text(function),
        None => Ok(" "),
    }
}

fn join(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = args[0].expect_list("join")?;
    let sep = separator(args, 1, "join")?;
    let parts: Vec<String> = items.borrow().iter().map(ToString::to_string).collect();
    Ok(Value::text(parts.join(sep)))
}

fn split(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let text = args[0].expect_text("split")?;
    let sep = separator(args, 1, "split")?;
    if sep.is_empty() {
        return Err(wrong_arg_type("split", "a non-empty separator", "empty Text"));
    }
    Ok(Value::list(text.split(sep).map(Value::text).collect()))
}

fn upper(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    Ok(Value::text(args[0].expect_text("upper")?.to_uppercase()))
}

fn lower(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    Ok(Value::text(args[0].expect_text("lower")?.to_lowercase()))
}

fn trim(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    Ok(Value::text(args[0].expect_text("trim")?.trim()))
}

fn replace(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let text = args[0].expect_text("replace")?;
    let from = args[1].expect_text("replace")?;
    let to = args[2].expect_text("replace")?;
    Ok(Value::text(text.replace(from, to)))
}

/// `slice(xs, start, end?)` over a list or text; out-of-range positions
/// clamp instead of failing.
fn slice(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let start = whole(&args[1], "slice")?;
    let end = optional(args, 2).map(|v| whole(v, "slice")).transpose()?;
    match &args[0] {
        Value::List(items) => {
            let items = items.borrow();
            let (from, to) = slice_bounds(items.len(), start, end);
            Ok(Value::list(items[from..to].to_vec()))
        }
        Value::Text(s) => {
            let (from, to) = slice_bounds(s.chars().count(), start, end);
            let part: String = s.chars().skip(from).take(to - from).collect();
            Ok(Value::text(part))
        }
        other => Err(wrong_arg_type("slice", "a List or Text", other.type_name())),
    }
}
