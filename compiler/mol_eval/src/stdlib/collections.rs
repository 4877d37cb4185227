//! List and map functions.

use std::cmp::Ordering;

use crate::callable::{HostContext, HostFunction};
use crate::errors::{wrong_arg_type, EvalError, EvalResult};
use crate::value::Value;

pub(super) const FUNCTIONS: &[HostFunction] = &[
    HostFunction::new("sort", 1, Some(1), sort),
    HostFunction::new("reverse", 1, Some(1), reverse),
    HostFunction::new("push", 2, Some(2), push),
    HostFunction::new("pop", 1, Some(1), pop),
    HostFunction::new("keys", 1, Some(1), keys),
    HostFunction::new("values", 1, Some(1), values),
    HostFunction::new("contains", 2, Some(2), contains),
    HostFunction::new("unique", 1, Some(1), unique),
    HostFunction::new("flatten", 1, Some(1), flatten),
];

/// A sorted copy; the input list is left as it was.
fn sort(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let mut items = args[0].expect_list("sort")?.borrow().clone();
    let mut incomparable = None;
    items.sort_by(|a, b| {
        a.compare(b).unwrap_or_else(|| {
            incomparable.get_or_insert_with(|| (a.type_name(), b.type_name()));
            Ordering::Equal
        })
    });
    if let Some((left, right)) = incomparable {
        return Err(wrong_arg_type(
            "sort",
            "a List of comparable values",
            &format!("{left} and {right}"),
        ));
    }
    Ok(Value::list(items))
}

fn reverse(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = args[0].expect_list("reverse")?;
    let reversed = items.borrow().iter().rev().cloned().collect();
    Ok(Value::list(reversed))
}

/// Appends in place and returns the same list.
fn push(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = args[0].expect_list("push")?;
    items.borrow_mut().push(args[1].clone());
    Ok(args[0].clone())
}

fn pop(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = args[0].expect_list("pop")?;
    let last = items.borrow_mut().pop();
    last.ok_or_else(|| EvalError::new("pop from empty list"))
}

fn keys(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Map(map) => Ok(Value::list(
            map.borrow().keys().map(|k| Value::Text(k.clone())).collect(),
        )),
        other => Err(wrong_arg_type("keys", "a Map", other.type_name())),
    }
}

fn values(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Map(map) => Ok(Value::list(map.borrow().values().cloned().collect())),
        other => Err(wrong_arg_type("values", "a Map", other.type_name())),
    }
}

/// Membership: an equal item of a list, a substring of a text, a key of a
/// map.
fn contains(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let needle = &args[1];
    let found = match &args[0] {
        Value::List(items) => items.borrow().iter().any(|item| item == needle),
        Value::Text(s) => s.contains(needle.expect_text("contains")?),
        Value::Map(map) => map.borrow().contains_key(needle.expect_text("contains")?),
        other => {
            return Err(wrong_arg_type(
                "contains",
                "a List, Text or Map",
                other.type_name(),
            ))
        }
    };
    Ok(Value::Bool(found))
}

/// Drops repeated items, keeping first occurrences in order.
fn unique(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = args[0].expect_list("unique")?;
    let mut kept: Vec<Value> = Vec::new();
    for item in items.borrow().iter() {
        if !kept.contains(item) {
            kept.push(item.clone());
        }
    }
    Ok(Value::list(kept))
}

/// Splices nested lists one level deep.
fn flatten(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let items = args[0].expect_list("flatten")?;
    let mut flat = Vec::new();
    for item in items.borrow().iter() {
        match item {
            Value::List(inner) => flat.extend(inner.borrow().iter().cloned()),
            other => flat.push(other.clone()),
        }
    }
    Ok(Value::list(flat))
}
