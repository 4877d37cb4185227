//! Conversions, numbers and time.

use std::cmp::Ordering;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{optional, whole};
use crate::callable::{HostContext, HostFunction};
use crate::errors::{conversion_failed, wrong_arg_type, EvalError, EvalResult};
use crate::value::{MapValue, Value};

pub(super) const FUNCTIONS: &[HostFunction] = &[
    HostFunction::new("len", 1, Some(1), len),
    HostFunction::new("type_of", 1, Some(1), type_of),
    HostFunction::new("to_text", 1, Some(1), to_text),
    HostFunction::new("to_number", 1, Some(1), to_number),
    HostFunction::new("range", 1, Some(3), range),
    HostFunction::new("abs", 1, Some(1), abs),
    HostFunction::new("round", 1, Some(2), round),
    HostFunction::new("sqrt", 1, Some(1), sqrt),
    HostFunction::new("max", 1, None, max),
    HostFunction::new("min", 1, None, min),
    HostFunction::new("sum", 1, Some(1), sum),
    HostFunction::new("clock", 0, Some(0), clock),
    HostFunction::new("wait", 1, Some(1), wait),
    HostFunction::new("inspect", 1, Some(1), inspect),
];

fn len(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Text(s) => Ok(Value::count(s.chars().count())),
        Value::List(items) => Ok(Value::count(items.borrow().len())),
        Value::Map(map) => Ok(Value::count(map.borrow().len())),
        other => Err(wrong_arg_type(
            "len",
            "a Text, List or Map",
            other.type_name(),
        )),
    }
}

fn type_of(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    Ok(Value::text(args[0].type_name()))
}

fn to_text(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    Ok(Value::text(args[0].to_string()))
}

fn to_number(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::Bool(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| conversion_failed(s, "Number")),
        other => Err(conversion_failed(&other.to_string(), "Number")),
    }
}

/// `range(stop)`, `range(start, stop)` or `range(start, stop, step)`.
#[allow(
    clippy::cast_precision_loss,
    reason = "bounds come from exactly representable whole numbers"
)]
fn range(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let bounds = args
        .iter()
        .map(|v| whole(v, "range"))
        .collect::<Result<Vec<i64>, EvalError>>()?;
    let (start, stop, step) = match bounds.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step, ..] => (*start, *stop, *step),
        [] => (0, 0, 1),
    };
    if step == 0 {
        return Err(EvalError::new("range() step must not be zero"));
    }
    let mut items = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        items.push(Value::Number(i as f64));
        i += step;
    }
    Ok(Value::list(items))
}

fn abs(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    Ok(Value::Number(args[0].expect_number("abs")?.abs()))
}

/// Round half to even, to `places` decimals.
fn round(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let n = args[0].expect_number("round")?;
    let places = match optional(args, 1) {
        Some(v) => whole(v, "round")?,
        None => 0,
    };
    let places = i32::try_from(places.clamp(-308, 308)).unwrap_or(0);
    let scale = 10f64.powi(places);
    Ok(Value::Number((n * scale).round_ties_even() / scale))
}

fn sqrt(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let n = args[0].expect_number("sqrt")?;
    if n < 0.0 {
        return Err(wrong_arg_type("sqrt", "a non-negative Number", "Number"));
    }
    Ok(Value::Number(n.sqrt()))
}

fn max(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    extreme("max", args, Ordering::Greater)
}

fn min(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    extreme("min", args, Ordering::Less)
}

/// `max`/`min` over the arguments, or over a single list argument. The
/// first of several equal extremes wins.
fn extreme(function: &str, args: &[Value], wanted: Ordering) -> EvalResult {
    let items = match args {
        [Value::List(items)] => items.borrow().clone(),
        _ => args.to_vec(),
    };
    let mut iter = items.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(EvalError::new(format!("{function}() arg is an empty sequence")));
    };
    for item in iter {
        match item.compare(&best) {
            Some(ord) if ord == wanted => best = item,
            Some(_) => {}
            None => {
                return Err(wrong_arg_type(
                    function,
                    "comparable values",
                    item.type_name(),
                ))
            }
        }
    }
    Ok(best)
}

fn sum(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = args[0].expect_list("sum")?;
    let mut total = 0.0;
    for item in items.borrow().iter() {
        total += item.expect_number("sum")?;
    }
    Ok(Value::Number(total))
}

/// Seconds since the Unix epoch.
fn clock(_: &mut dyn HostContext, _: &[Value]) -> EvalResult {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64());
    Ok(Value::Number(now))
}

fn wait(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let seconds = args[0].expect_number("wait")?;
    let duration = Duration::try_from_secs_f64(seconds)
        .map_err(|_| wrong_arg_type("wait", "a non-negative Number", "Number"))?;
    std::thread::sleep(duration);
    Ok(Value::Null)
}

/// A record's fields, or `{type, value}` for anything else.
fn inspect(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Record(record) => Ok(Value::map(record.to_map())),
        other => {
            let mut map = MapValue::new();
            map.insert("type", Value::text(other.type_name()));
            map.insert("value", other.clone());
            Ok(Value::map(map))
        }
    }
}
