//! Binary and unary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch: the operand type set is closed, so matching on
//! `(left, right)` covers every combination and anything unmatched is a type
//! error. Short-circuit operators are decided by the interpreter before the
//! right operand is evaluated; the arms here give the same results when both
//! sides are already known.

use std::cmp::Ordering;

use mol_ir::ast::{BinaryOp, UnaryOp};

use crate::errors::{
    division_by_zero, invalid_binary_op, invalid_unary_op, modulo_by_zero, EvalResult,
};
use crate::value::{as_integer, Value};

/// Evaluate `left op right`.
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => return Ok(if left.is_truthy() { right } else { left }),
        BinaryOp::Or => return Ok(if left.is_truthy() { left } else { right }),
        BinaryOp::Coalesce => {
            return Ok(if matches!(left, Value::Null) { right } else { left })
        }
        BinaryOp::Eq => return Ok(Value::Bool(left.equals(&right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!left.equals(&right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            return eval_comparison(&left, &right, op)
        }
        _ => {}
    }

    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => eval_number_binary(*a, *b, op),
        (Value::Text(_), _) | (_, Value::Text(_)) if op == BinaryOp::Add => {
            Ok(Value::text(format!("{left}{right}")))
        }
        (Value::Text(s), Value::Number(n)) | (Value::Number(n), Value::Text(s))
            if op == BinaryOp::Mul =>
        {
            Ok(repeat_text(s, *n))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        _ => Err(invalid_binary_op(op, left.type_name(), right.type_name())),
    }
}

fn eval_number_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    let n = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(division_by_zero());
            }
            a / b
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(modulo_by_zero());
            }
            floored_rem(a, b)
        }
        _ => return Err(invalid_binary_op(op, "Number", "Number")),
    };
    Ok(Value::Number(n))
}

/// Remainder with the sign of the divisor: `-7 % 3 == 2`.
fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn repeat_text(s: &str, times: f64) -> Value {
    let count = as_integer(times)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    Value::text(s.repeat(count))
}

fn eval_comparison(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let Some(ordering) = left.compare(right) else {
        return Err(invalid_binary_op(op, left.type_name(), right.type_name()));
    };
    let result = match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

/// Evaluate `op operand`.
pub fn evaluate_unary(operand: &Value, op: UnaryOp) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Neg, other) => Err(invalid_unary_op(op, other.type_name())),
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::errors::EvalErrorKind;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn binary(l: Value, r: Value, op: BinaryOp) -> Value {
        match evaluate_binary(l, r, op) {
            Ok(v) => v,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(binary(num(7.0), num(2.0), BinaryOp::Add), num(9.0));
        assert_eq!(binary(num(7.0), num(2.0), BinaryOp::Div), num(3.5));
        assert_eq!(binary(num(-7.0), num(3.0), BinaryOp::Mod), num(2.0));
        assert_eq!(binary(num(7.0), num(-3.0), BinaryOp::Mod), num(-2.0));
        assert_eq!(binary(num(6.0), num(3.0), BinaryOp::Mod), num(0.0));
    }

    #[test]
    fn test_division_by_zero_raises() {
        let err = evaluate_binary(num(1.0), num(0.0), BinaryOp::Div).err();
        assert_eq!(err.map(|e| e.kind), Some(EvalErrorKind::DivisionByZero));
        let err = evaluate_binary(num(1.0), num(0.0), BinaryOp::Mod).err();
        assert_eq!(err.map(|e| e.kind), Some(EvalErrorKind::ModuloByZero));
    }

    #[test]
    fn test_text_concat_and_repeat() {
        assert_eq!(
            binary(Value::text("n="), num(3.0), BinaryOp::Add),
            Value::text("n=3")
        );
        assert_eq!(
            binary(num(1.5), Value::text("x"), BinaryOp::Add),
            Value::text("1.5x")
        );
        assert_eq!(
            binary(Value::text("ab"), num(3.0), BinaryOp::Mul),
            Value::text("ababab")
        );
        assert_eq!(
            binary(Value::text("ab"), num(-1.0), BinaryOp::Mul),
            Value::text("")
        );
    }

    #[test]
    fn test_list_concat_makes_new_list() {
        let a = Value::list(vec![num(1.0)]);
        let b = Value::list(vec![num(2.0)]);
        let joined = binary(a.clone(), b, BinaryOp::Add);
        assert_eq!(joined, Value::list(vec![num(1.0), num(2.0)]));
        assert!(!joined.equals(&a));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary(num(1.0), num(2.0), BinaryOp::Lt), Value::Bool(true));
        assert_eq!(binary(num(2.0), num(2.0), BinaryOp::GtEq), Value::Bool(true));
        assert_eq!(
            binary(Value::text("a"), Value::text("b"), BinaryOp::Gt),
            Value::Bool(false)
        );
        assert!(evaluate_binary(num(1.0), Value::text("1"), BinaryOp::Lt).is_err());
        assert_eq!(binary(num(1.0), Value::text("1"), BinaryOp::Eq), Value::Bool(false));
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = evaluate_binary(Value::Null, num(1.0), BinaryOp::Sub).err();
        assert_eq!(
            err.map(|e| e.message),
            Some("unsupported operand types for `-`: Null and Number".to_string())
        );
    }

    #[test]
    fn test_logical_values() {
        assert_eq!(binary(num(0.0), Value::text("x"), BinaryOp::Or), Value::text("x"));
        assert_eq!(binary(num(0.0), Value::text("x"), BinaryOp::And), num(0.0));
        assert_eq!(binary(Value::Null, num(5.0), BinaryOp::Coalesce), num(5.0));
        assert_eq!(binary(Value::Bool(false), num(5.0), BinaryOp::Coalesce), Value::Bool(false));
    }

    #[test]
    fn test_unary() {
        assert_eq!(evaluate_unary(&num(2.0), UnaryOp::Neg).ok(), Some(num(-2.0)));
        assert_eq!(
            evaluate_unary(&Value::list(vec![]), UnaryOp::Not).ok(),
            Some(Value::Bool(true))
        );
        assert!(evaluate_unary(&Value::text("x"), UnaryOp::Neg).is_err());
    }
}
