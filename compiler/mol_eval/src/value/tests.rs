use pretty_assertions::assert_eq;

use super::*;

fn list(items: Vec<Value>) -> Value {
    Value::list(items)
}

#[test]
fn test_truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::text("").is_truthy());
    assert!(!list(vec![]).is_truthy());

    assert!(Value::Number(-1.0).is_truthy());
    assert!(Value::text("0").is_truthy());
    assert!(list(vec![Value::Null]).is_truthy());
    assert!(Value::map(MapValue::new()).is_truthy());
}

#[test]
fn test_show_formatting() {
    assert_eq!(Value::Number(42.0).to_string(), "42");
    assert_eq!(Value::Number(-0.0).to_string(), "0");
    assert_eq!(Value::Number(3.14).to_string(), "3.14");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::text("hi").to_string(), "hi");

    let mut map = MapValue::new();
    map.insert("a", Value::Number(1.0));
    map.insert("b", list(vec![Value::text("x"), Value::Bool(true)]));
    assert_eq!(Value::map(map).to_string(), r#"{"a": 1, "b": ["x", true]}"#);
}

#[test]
fn test_self_containing_list_prints() {
    let xs = list(vec![Value::Number(1.0)]);
    if let Value::List(items) = &xs {
        items.borrow_mut().push(xs.clone());
    }
    assert_eq!(xs.to_string(), "[1, [...]]");
}

#[test]
fn test_equality_is_by_identity_for_containers() {
    let a = list(vec![Value::Number(1.0)]);
    let b = list(vec![Value::Number(1.0)]);
    assert!(a.equals(&a.clone()));
    assert!(!a.equals(&b));
    // Structural equality is still available on the Rust side.
    assert_eq!(a, b);

    assert!(Value::text("x").equals(&Value::text("x")));
    assert!(!Value::Number(1.0).equals(&Value::text("1")));
}

#[test]
fn test_describe() {
    assert_eq!(Value::Number(42.0).describe(), "Number(42)");
    assert_eq!(Value::Number(3.14159).describe(), "Number(3.14)");
    assert_eq!(Value::text("Hello").describe(), "Text(\"Hello\")");
    assert_eq!(
        Value::text("a".repeat(40)).describe(),
        format!("Text(\"{}...\")", "a".repeat(32))
    );
    assert_eq!(
        list(vec![Value::text("A"), Value::text("B")]).describe(),
        "List<2 Texts>"
    );
    assert_eq!(list(vec![]).describe(), "List<empty>");
    assert_eq!(Value::map(MapValue::new()).describe(), "Map<0 entries>");
    assert_eq!(Value::Bool(true).describe(), "true");
}

#[test]
fn test_matches_type() {
    assert_eq!(Value::Number(1.0).matches_type("Number"), Some(true));
    assert_eq!(Value::text("1").matches_type("Number"), Some(false));
    assert_eq!(Value::Null.matches_type("Whatever"), None);
}

#[test]
fn test_as_integer() {
    assert_eq!(as_integer(3.0), Some(3));
    assert_eq!(as_integer(-2.0), Some(-2));
    assert_eq!(as_integer(2.5), None);
    assert_eq!(as_integer(f64::INFINITY), None);
    assert_eq!(as_integer(f64::NAN), None);
}

#[test]
fn test_compare() {
    assert_eq!(
        Value::Number(1.0).compare(&Value::Number(2.0)),
        Some(Ordering::Less)
    );
    assert_eq!(
        Value::text("b").compare(&Value::text("a")),
        Some(Ordering::Greater)
    );
    assert_eq!(Value::Number(1.0).compare(&Value::text("a")), None);
}

#[test]
fn test_json_round_trip_shapes() {
    let mut map = MapValue::new();
    map.insert("n", Value::Number(2.0));
    map.insert("f", Value::Number(0.5));
    map.insert("xs", list(vec![Value::Null, Value::Bool(false)]));
    let json = serde_json::to_string(&Value::map(map)).unwrap_or_default();
    assert_eq!(json, r#"{"n":2,"f":0.5,"xs":[null,false]}"#);

    let parsed: serde_json::Value = serde_json::from_str("[1, \"a\", {\"k\": null}]")
        .unwrap_or(serde_json::Value::Null);
    assert_eq!(Value::from(parsed).to_string(), r#"[1, "a", {"k": null}]"#);
}

#[test]
fn test_expect_index() {
    assert_eq!(Value::Number(3.0).expect_index("slice"), Ok(3));
    assert!(Value::Number(-1.0).expect_index("slice").is_err());
    assert!(Value::Number(1.5).expect_index("slice").is_err());
    assert!(Value::text("3").expect_index("slice").is_err());
}
