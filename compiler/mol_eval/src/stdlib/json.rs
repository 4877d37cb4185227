//! JSON conversion through `serde_json`.

use crate::callable::{HostContext, HostFunction};
use crate::errors::{EvalError, EvalResult};
use crate::value::Value;

pub(super) const FUNCTIONS: &[HostFunction] = &[
    HostFunction::new("to_json", 1, Some(1), to_json),
    HostFunction::new("from_json", 1, Some(1), from_json),
];

/// Pretty-printed with two-space indentation. Records serialize as their
/// field maps.
fn to_json(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    serde_json::to_string_pretty(&args[0])
        .map(Value::text)
        .map_err(|e| EvalError::new(format!("cannot encode JSON: {e}")))
}

fn from_json(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let text = args[0].expect_text("from_json")?;
    serde_json::from_str::<serde_json::Value>(text)
        .map(Value::from)
        .map_err(|e| EvalError::new(format!("invalid JSON: {e}")))
}
