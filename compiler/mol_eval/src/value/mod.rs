//! Runtime values.
//!
//! [`Value`] is the closed set of things a MOL expression can produce.
//! Primitives are held inline; lists, maps, functions and domain records
//! are shared handles, so copying a value never copies the container.

mod map;
pub mod record;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

pub use map::MapValue;
pub use record::{Record, RECORD_TYPE_NAMES};

use crate::callable::Callable;
use crate::errors::{wrong_arg_type, EvalError};

/// A shared, mutable list.
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// A shared, mutable map.
pub type MapRef = Rc<RefCell<MapValue>>;

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// The only numeric type; integer-valued numbers print without a fraction.
    Number(f64),
    Text(Rc<str>),
    List(ListRef),
    Map(MapRef),
    Function(Callable),
    Record(Record),
}

/// `n` as an integer, when it is integer-valued and exactly representable.
#[allow(
    clippy::cast_possible_truncation,
    reason = "the value is integral and within the exact f64 integer range"
)]
pub fn as_integer(n: f64) -> Option<i64> {
    const EXACT: f64 = 9_007_199_254_740_992.0;
    if n.is_finite() && n.trunc() == n && n.abs() <= EXACT {
        Some(n as i64)
    } else {
        None
    }
}

/// A length or count as a MOL number.
pub fn count_as_number(n: usize) -> f64 {
    u32::try_from(n).map_or(f64::from(u32::MAX), f64::from)
}

/// Number formatting used by `show`: `42`, `3.14`, `-0.5`.
pub fn format_number(n: f64) -> String {
    match as_integer(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

/// Float formatting that always keeps a fractional part: `1.0`, `0.85`.
pub fn py_float(n: f64) -> String {
    if as_integer(n).is_some() {
        format!("{n:.1}")
    } else {
        n.to_string()
    }
}

impl Value {
    pub fn text(s: impl Into<Rc<str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(map: MapValue) -> Self {
        Value::Map(Rc::new(RefCell::new(map)))
    }

    pub fn count(n: usize) -> Self {
        Value::Number(count_as_number(n))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Function(_) => "Function",
            Value::Record(r) => r.type_name(),
        }
    }

    /// `null`, `false`, `0`, `""` and `[]` are falsy. Everything else,
    /// the empty map included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Map(_) | Value::Function(_) | Value::Record(_) => true,
        }
    }

    /// The language's `==`: by value for primitives, by identity for
    /// lists, maps, functions and records.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.same_as(b),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Ordering for `<`, `>`, `sort`, `max` and `min`: numbers with numbers,
    /// text with text.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Whether the value satisfies a declared type name. `None` when the name
    /// is not a known type, in which case no check applies.
    pub fn matches_type(&self, name: &str) -> Option<bool> {
        let known = matches!(
            name,
            "Number" | "Text" | "Bool" | "List" | "Map" | "Function"
        ) || RECORD_TYPE_NAMES.contains(&name);
        known.then(|| self.type_name() == name)
    }

    /// Text form with strings quoted, as shown inside containers.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        let _ = write_value(&mut out, self, true, &mut Vec::new());
        out
    }

    /// One-line description for pipe traces.
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => match as_integer(*n) {
                Some(i) => format!("Number({i})"),
                None => format!("Number({n:.2})"),
            },
            Value::Text(s) => {
                if s.chars().count() > 35 {
                    let head: String = s.chars().take(32).collect();
                    format!("Text(\"{head}...\")")
                } else {
                    format!("Text(\"{s}\")")
                }
            }
            Value::List(items) => {
                let items = items.borrow();
                match items.first() {
                    Some(first) => format!("List<{} {}s>", items.len(), first.type_name()),
                    None => "List<empty>".to_string(),
                }
            }
            Value::Map(map) => format!("Map<{} entries>", map.borrow().len()),
            Value::Function(f) => format!("Function({})", f.name()),
            Value::Record(r) => r.repr(),
        }
    }

    // Argument helpers for host functions and methods.

    pub fn expect_number(&self, function: &str) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(wrong_arg_type(function, "a Number", other.type_name())),
        }
    }

    pub fn expect_text(&self, function: &str) -> Result<&str, EvalError> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(wrong_arg_type(function, "a Text", other.type_name())),
        }
    }

    pub fn expect_list(&self, function: &str) -> Result<ListRef, EvalError> {
        match self {
            Value::List(items) => Ok(Rc::clone(items)),
            other => Err(wrong_arg_type(function, "a List", other.type_name())),
        }
    }

    /// A non-negative integer, for counts and positions.
    pub fn expect_index(&self, function: &str) -> Result<usize, EvalError> {
        let n = self.expect_number(function)?;
        as_integer(n)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| wrong_arg_type(function, "a non-negative whole Number", "Number"))
    }
}

/// Identity of a container, for cycle detection while printing.
fn container_ptr(value: &Value) -> Option<*const ()> {
    match value {
        Value::List(items) => Some(Rc::as_ptr(items).cast()),
        Value::Map(map) => Some(Rc::as_ptr(map).cast()),
        _ => None,
    }
}

fn write_value(
    out: &mut impl fmt::Write,
    value: &Value,
    quote_text: bool,
    seen: &mut Vec<*const ()>,
) -> fmt::Result {
    if let Some(ptr) = container_ptr(value) {
        if seen.contains(&ptr) {
            return out.write_str(if matches!(value, Value::List(_)) {
                "[...]"
            } else {
                "{...}"
            });
        }
        seen.push(ptr);
    }
    match value {
        Value::Null => out.write_str("null")?,
        Value::Bool(b) => write!(out, "{b}")?,
        Value::Number(n) => out.write_str(&format_number(*n))?,
        Value::Text(s) if quote_text => write!(out, "{:?}", &**s)?,
        Value::Text(s) => out.write_str(s)?,
        Value::List(items) => {
            out.write_char('[')?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_value(out, item, true, seen)?;
            }
            out.write_char(']')?;
        }
        Value::Map(map) => {
            out.write_char('{')?;
            for (i, (key, item)) in map.borrow().iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write!(out, "{key:?}: ")?;
                write_value(out, item, true, seen)?;
            }
            out.write_char('}')?;
        }
        Value::Function(f) => write!(out, "<function {}>", f.name())?,
        Value::Record(r) => out.write_str(&r.repr())?,
    }
    if container_ptr(value).is_some() {
        seen.pop();
    }
    Ok(())
}

/// The text `show` prints: strings unquoted at the top level.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, false, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, true, &mut Vec::new())
    }
}

/// Structural equality, for Rust-side comparisons and the stdlib's
/// membership helpers. The language's `==` is [`Value::equals`].
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Map(a), Value::Map(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            _ => self.equals(other),
        }
    }
}

/// Nesting beyond this fails to serialize. Record fields are rebuilt on
/// every visit, so a record reachable from itself is only caught here.
const MAX_SERIALIZE_DEPTH: usize = 512;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let seen = RefCell::new(Vec::new());
        Guarded {
            value: self,
            seen: &seen,
        }
        .serialize(serializer)
    }
}

/// A value being serialized, with the containers currently open above it.
struct Guarded<'a> {
    value: &'a Value,
    seen: &'a RefCell<Vec<*const ()>>,
}

impl Guarded<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> Guarded<'b> {
        Guarded {
            value,
            seen: self.seen,
        }
    }
}

impl Serialize for Guarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ptr = container_ptr(self.value);
        if let Some(ptr) = ptr {
            let mut seen = self.seen.borrow_mut();
            if seen.contains(&ptr) {
                return Err(S::Error::custom("circular reference"));
            }
            seen.push(ptr);
        }
        let result = self.serialize_value(serializer);
        if ptr.is_some() {
            self.seen.borrow_mut().pop();
        }
        result
    }
}

impl Guarded<'_> {
    fn serialize_value<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Map(map) => self.serialize_map(&map.borrow(), serializer),
            Value::Function(f) => serializer.serialize_str(&format!("Function({})", f.name())),
            Value::Record(r) => {
                if self.seen.borrow().len() >= MAX_SERIALIZE_DEPTH {
                    return Err(S::Error::custom("nesting too deep"));
                }
                // Records count toward the depth through a null marker.
                self.seen.borrow_mut().push(std::ptr::null());
                let result = self.serialize_map(&r.to_map(), serializer);
                self.seen.borrow_mut().pop();
                result
            }
        }
    }

    fn serialize_map<S: Serializer>(&self, map: &MapValue, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in map.iter() {
            out.serialize_entry(key, &self.child(value))?;
        }
        out.end()
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::text(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Rc::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests;
