use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_intern_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("pipeline_total");
    let b = interner.intern("pipeline_total");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "pipeline_total");
}

#[test]
fn test_distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    assert_ne!(interner.intern("double"), interner.intern("add_ten"));
}

#[test]
fn test_empty_string_is_name_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn test_keywords_are_pre_interned() {
    let interner = StringInterner::new();
    let before = interner.len();
    interner.intern("define");
    interner.intern("rescue");
    assert_eq!(interner.len(), before);
}

#[test]
fn test_lookup_unknown_name_is_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(u32::MAX)), "");
}

#[test]
fn test_shared_interner_clones_share_table() {
    let shared = SharedInterner::new();
    let other = shared.clone();
    let name = shared.intern("adder");
    assert_eq!(other.lookup(name), "adder");
}
