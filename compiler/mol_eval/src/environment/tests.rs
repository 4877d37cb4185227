use pretty_assertions::assert_eq;

use super::*;
use mol_ir::StringInterner;

#[test]
fn test_scope_define_lookup() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut scope = Scope::new();
    scope.define(x, Value::Number(42.0));
    assert_eq!(scope.lookup(x), Some(Value::Number(42.0)));
    assert!(scope.has_local(x));
}

#[test]
fn test_scope_shadowing() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let parent = LocalScope::new(Scope::new());
    parent.borrow_mut().define(x, Value::Number(1.0));

    let mut child = Scope::with_parent(parent.clone());
    child.define(x, Value::Number(2.0));

    assert_eq!(child.lookup(x), Some(Value::Number(2.0)));
    assert_eq!(parent.borrow().lookup(x), Some(Value::Number(1.0)));
}

#[test]
fn test_assign_updates_nearest_binding() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let parent = LocalScope::new(Scope::new());
    parent.borrow_mut().define(x, Value::Number(1.0));
    let mut child = Scope::with_parent(parent.clone());

    assert_eq!(child.assign(x, Value::Number(5.0)), Ok(()));
    assert!(!child.has_local(x));
    assert_eq!(parent.borrow().lookup(x), Some(Value::Number(5.0)));
}

#[test]
fn test_assign_unbound() {
    let interner = StringInterner::new();
    let y = interner.intern("y");

    let mut env = Environment::new();
    assert_eq!(env.assign(y, Value::Null), Err(Unbound));
}

#[test]
fn test_environment_push_pop() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let inner = interner.intern("inner");

    let mut env = Environment::new();
    env.define(x, Value::Number(1.0));

    env.push_scope();
    env.define(x, Value::Number(2.0));
    env.define(inner, Value::Bool(true));
    assert_eq!(env.lookup(x), Some(Value::Number(2.0)));
    assert_eq!(env.depth(), 2);

    env.pop_scope();
    assert_eq!(env.lookup(x), Some(Value::Number(1.0)));
    assert_eq!(env.lookup(inner), None);
}

#[test]
fn test_base_scope_is_never_popped() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define(x, Value::Number(1.0));
    env.pop_scope();
    env.pop_scope();
    assert_eq!(env.depth(), 1);
    assert_eq!(env.lookup(x), Some(Value::Number(1.0)));
}

#[test]
fn test_frame_sees_captured_scope_not_caller() {
    let interner = StringInterner::new();
    let n = interner.intern("n");
    let local = interner.intern("local");

    let mut env = Environment::new();
    env.push_scope();
    env.define(n, Value::Number(5.0));
    let captured = env.current_scope();
    env.pop_scope();

    env.push_scope();
    env.define(local, Value::Number(1.0));
    let frame = env.frame(&captured);

    assert_eq!(frame.lookup(n), Some(Value::Number(5.0)));
    assert_eq!(frame.lookup(local), None);
    assert!(frame.global().ptr_eq(env.global()));
}

#[test]
fn test_captured_scope_observes_later_writes() {
    let interner = StringInterner::new();
    let count = interner.intern("count");

    let mut env = Environment::new();
    env.define(count, Value::Number(0.0));
    let captured = env.current_scope();

    assert_eq!(env.assign(count, Value::Number(3.0)), Ok(()));
    assert_eq!(captured.borrow().lookup(count), Some(Value::Number(3.0)));
}

#[test]
fn test_define_global_from_nested_scope() {
    let interner = StringInterner::new();
    let g = interner.intern("g");

    let mut env = Environment::new();
    env.push_scope();
    env.define_global(g, Value::Bool(true));
    env.pop_scope();
    assert_eq!(env.lookup(g), Some(Value::Bool(true)));
}
