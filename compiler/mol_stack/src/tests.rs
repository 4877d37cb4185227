use super::*;

enum Nested {
    Leaf(i64),
    Neg(Box<Nested>),
}

fn build(depth: usize) -> Nested {
    let mut node = Nested::Leaf(1);
    for _ in 0..depth {
        node = Nested::Neg(Box::new(node));
    }
    node
}

fn eval(node: &Nested) -> i64 {
    ensure_sufficient_stack(|| match node {
        Nested::Leaf(v) => *v,
        Nested::Neg(inner) => -eval(inner),
    })
}

#[test]
fn test_shallow_tree() {
    assert_eq!(eval(&build(3)), -1);
}

#[test]
fn test_deeply_nested_tree_does_not_overflow() {
    let tree = build(200_000);
    assert_eq!(eval(&tree), 1);
    // Iterative drop so the test itself does not recurse.
    let mut cur = tree;
    while let Nested::Neg(inner) = cur {
        cur = *inner;
    }
}

#[test]
fn test_propagates_result() {
    let result: Result<u8, String> = ensure_sufficient_stack(|| Err("boom".to_string()));
    assert_eq!(result, Err("boom".to_string()));
}
