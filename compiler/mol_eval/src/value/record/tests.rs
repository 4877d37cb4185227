use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_reprs() {
    let thought = Record::thought(Thought::new(1, "hello".into(), 0.85));
    assert_eq!(thought.repr(), "<Thought:00000001 \"hello\" conf=0.85>");

    let node = Record::node(Node::new(10, "core".into(), 0.5));
    assert_eq!(node.repr(), "<Node:0000000a \"core\" w=0.50 idle gen=0>");

    let memory = Record::memory(Memory::new(2, "k".into(), Value::Null));
    assert_eq!(memory.repr(), "<Memory:00000002 key=\"k\" strength=1.00>");

    let stream = Record::stream(Stream::new(3, "s".into()));
    assert_eq!(stream.repr(), "<Stream:00000003 \"s\" buf=0 unsynced>");

    let full = Record::thought(Thought::new(4, "x".into(), 7.0));
    assert_eq!(full.repr(), "<Thought:00000004 \"x\" conf=1.0>");
}

#[test]
fn test_chunk_and_document_reprs() {
    let chunk = Record::chunk(Chunk {
        id: 5,
        content: "word ".repeat(10),
        index: 2.0,
        source: "<string>".into(),
    });
    assert_eq!(
        chunk.repr(),
        "<Chunk:00000005 #2 \"word word word word word word ...\">"
    );

    let doc = Record::document(Document {
        id: 6,
        source: "notes.txt".into(),
        content: "abc".into(),
    });
    assert_eq!(doc.repr(), "<Document:00000006 \"notes.txt\" 3B>");
}

#[test]
fn test_node_methods_chain() {
    let node = Record::node(Node::new(1, "n".into(), 2.0));
    let other = Record::node(Node::new(2, "m".into(), 0.0));

    let result = node.call_method("activate", &[]);
    assert!(matches!(result, Ok(Value::Record(ref r)) if r.ptr_eq(&node)));

    assert!(node.call_method("evolve", &[Value::Number(2.0)]).is_ok());
    assert!(node
        .call_method("connect", &[Value::Record(other.clone())])
        .is_ok());

    assert_eq!(node.field("weight"), Ok(Value::Number(4.0)));
    assert_eq!(node.field("generation"), Ok(Value::Number(1.0)));
    assert_eq!(node.field("active"), Ok(Value::Bool(true)));
    assert_eq!(node.repr(), "<Node:00000001 \"n\" w=4.00 active gen=1>");

    let err = node.call_method("connect", &[Value::Number(1.0)]);
    assert!(err.is_err());
}

#[test]
fn test_memory_recall_and_decay() {
    let memory = Record::memory(Memory::new(1, "k".into(), Value::text("v")));
    assert!(memory.call_method("decay", &[Value::Number(0.5)]).is_ok());
    assert_eq!(memory.call_method("recall", &[]), Ok(Value::text("v")));
    assert_eq!(memory.field("strength"), Ok(Value::Number(0.6)));
    assert_eq!(memory.field("recall_count"), Ok(Value::Number(1.0)));
}

#[test]
fn test_stream_emit_and_consume() {
    let stream = Record::stream(Stream::new(1, "s".into()));
    assert!(stream.call_method("emit", &[Value::Number(1.0)]).is_ok());
    assert!(stream.call_method("sync", &[]).is_ok());
    assert_eq!(stream.repr(), "<Stream:00000001 \"s\" buf=1 synced>");
    assert_eq!(
        stream.call_method("consume", &[]),
        Ok(Value::list(vec![Value::Number(1.0)]))
    );
    assert_eq!(stream.field("buffer"), Ok(Value::list(vec![])));
}

#[test]
fn test_unknown_field_and_method() {
    let thought = Record::thought(Thought::new(1, "x".into(), 1.0));
    assert_eq!(
        thought.field("nope").map_err(|e| e.message),
        Err("no field 'nope' on Thought".to_string())
    );
    assert_eq!(
        thought.call_method("fly", &[]).map_err(|e| e.message),
        Err("no method 'fly' on Thought".to_string())
    );
    assert!(thought.set_field("tags", Value::Null).is_err());
    assert!(thought.set_field("confidence", Value::Number(0.3)).is_ok());
    assert_eq!(thought.field("confidence"), Ok(Value::Number(0.3)));
}

#[test]
fn test_embeddings_are_deterministic_unit_vectors() {
    let a = embed_vector("hello world");
    let b = embed_vector("hello world");
    assert_eq!(a, b);
    assert_eq!(a.len(), EMBEDDING_DIMENSIONS);
    let norm: f64 = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!((norm - 1.0).abs() < 1e-9);
    assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
}

#[test]
fn test_vector_store_search_ranks_exact_match_first() {
    let store = Record::vector_store(VectorStore::new(1, "kb".into()));
    for (id, text) in [(2, "cats purr"), (3, "rust compiles"), (4, "dogs bark")] {
        let emb = Record::embedding(Embedding::new(id, text, None));
        assert!(store.call_method("add", &[Value::Record(emb)]).is_ok());
    }
    assert_eq!(store.field("count"), Ok(Value::Number(3.0)));

    let Ok(Value::List(hits)) =
        store.call_method("search", &[Value::text("rust compiles"), Value::Number(1.0)])
    else {
        panic!("expected a list of hits");
    };
    let hits = hits.borrow();
    assert_eq!(hits.len(), 1);
    let Value::Map(best) = &hits[0] else {
        panic!("expected a map");
    };
    assert_eq!(best.borrow().get("text"), Some(&Value::text("rust compiles")));
    assert_eq!(best.borrow().get("score"), Some(&Value::Number(1.0)));
}

#[test]
fn test_to_map_for_inspect() {
    let node = Record::node(Node::new(1, "n".into(), 0.0));
    let map = node.to_map();
    let keys: Vec<_> = map.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["id", "label", "weight", "active", "generation"]);
}
