//! Pattern matching for `match` arms.

use mol_ir::ast::{Pattern, PatternKind};
use mol_ir::Name;

use crate::value::Value;

/// Whether `value` matches `pattern`, pushing the names it binds.
///
/// On failure `bindings` may hold partial results; callers discard it.
pub(super) fn match_pattern(
    pattern: &Pattern,
    value: &Value,
    bindings: &mut Vec<(Name, Value)>,
) -> bool {
    match (&pattern.kind, value) {
        (PatternKind::Wildcard, _) => true,
        (PatternKind::Binding(name), _) => {
            bindings.push((*name, value.clone()));
            true
        }
        (PatternKind::Number(expected), Value::Number(n)) => n == expected,
        (PatternKind::Text(expected), Value::Text(s)) => **s == **expected,
        (PatternKind::Bool(expected), Value::Bool(b)) => b == expected,
        (PatternKind::Null, Value::Null) => true,
        (PatternKind::List { items, rest }, Value::List(list)) => {
            let list = list.borrow();
            let fits = match rest {
                Some(_) => list.len() >= items.len(),
                None => list.len() == items.len(),
            };
            if !fits {
                return false;
            }
            for (item, element) in items.iter().zip(list.iter()) {
                if !match_pattern(item, element, bindings) {
                    return false;
                }
            }
            if let Some(rest) = rest {
                bindings.push((*rest, Value::list(list[items.len()..].to_vec())));
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use mol_ir::Span;

    fn pat(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn test_literals() {
        let mut b = Vec::new();
        assert!(match_pattern(&pat(PatternKind::Number(1.0)), &Value::Number(1.0), &mut b));
        assert!(!match_pattern(&pat(PatternKind::Number(1.0)), &Value::text("1"), &mut b));
        assert!(match_pattern(&pat(PatternKind::Text("a".into())), &Value::text("a"), &mut b));
        assert!(match_pattern(&pat(PatternKind::Null), &Value::Null, &mut b));
        assert!(!match_pattern(&pat(PatternKind::Bool(true)), &Value::Number(1.0), &mut b));
        assert!(b.is_empty());
    }

    #[test]
    fn test_list_with_rest() {
        let head = Name::from_raw(1);
        let tail = Name::from_raw(2);
        let pattern = pat(PatternKind::List {
            items: vec![pat(PatternKind::Binding(head))],
            rest: Some(tail),
        });
        let value = Value::list(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);

        let mut bindings = Vec::new();
        assert!(match_pattern(&pattern, &value, &mut bindings));
        assert_eq!(
            bindings,
            vec![
                (head, Value::Number(1.0)),
                (tail, Value::list(vec![Value::Number(2.0), Value::Number(3.0)])),
            ]
        );
    }

    #[test]
    fn test_list_length_must_match_without_rest() {
        let pattern = pat(PatternKind::List {
            items: vec![pat(PatternKind::Wildcard)],
            rest: None,
        });
        let value = Value::list(vec![Value::Null, Value::Null]);
        assert!(!match_pattern(&pattern, &value, &mut Vec::new()));
    }
}
