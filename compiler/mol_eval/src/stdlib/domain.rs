//! Domain record constructors and the retrieval helpers built on them.
//!
//! Constructors take every argument optionally and fill in the usual
//! defaults. Record ids come from the running interpreter so they are
//! sequential within one run.

use super::{content_of, optional, whole};
use crate::callable::{HostContext, HostFunction};
use crate::errors::{wrong_arg_type, EvalError, EvalResult};
use crate::value::record::{
    cosine_similarity, round4, Chunk, Document, Embedding, Memory, Node, Stream, Thought,
    VectorStore,
};
use crate::value::{count_as_number, MapValue, Record, Value};

pub(super) const FUNCTIONS: &[HostFunction] = &[
    HostFunction::new("Thought", 0, Some(2), thought),
    HostFunction::new("Memory", 0, Some(2), memory),
    HostFunction::new("Node", 0, Some(2), node),
    HostFunction::new("Stream", 0, Some(1), stream),
    HostFunction::new("Document", 0, Some(2), document),
    HostFunction::new("Chunk", 0, Some(3), chunk_record),
    HostFunction::new("Embedding", 0, Some(2), embedding),
    HostFunction::new("VectorStore", 0, Some(1), vector_store),
    HostFunction::new("chunk", 1, Some(2), chunk),
    HostFunction::new("embed", 1, Some(2), embed),
    HostFunction::new("store", 1, Some(2), store),
    HostFunction::new("retrieve", 1, Some(3), retrieve),
    HostFunction::new("cosine_sim", 2, Some(2), cosine_sim),
    HostFunction::new("think", 1, Some(2), think),
    HostFunction::new("recall", 1, Some(1), recall),
    HostFunction::new("classify", 1, None, classify),
    HostFunction::new("summarize", 1, Some(2), summarize),
];

const DEFAULT_STORE: &str = "default";

/// Text form of the optional argument at `index`, or `default`.
fn text_arg(args: &[Value], index: usize, default: &str) -> String {
    optional(args, index).map_or_else(|| default.to_string(), ToString::to_string)
}

fn number_arg(args: &[Value], index: usize, function: &str, default: f64) -> Result<f64, EvalError> {
    optional(args, index).map_or(Ok(default), |v| v.expect_number(function))
}

fn thought(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let content = text_arg(args, 0, "");
    let confidence = number_arg(args, 1, "Thought", 1.0)?;
    let id = ctx.next_record_id();
    Ok(Value::Record(Record::thought(Thought::new(id, content, confidence))))
}

fn memory(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let key = text_arg(args, 0, "");
    let value = optional(args, 1).cloned().unwrap_or(Value::Null);
    let id = ctx.next_record_id();
    Ok(Value::Record(Record::memory(Memory::new(id, key, value))))
}

fn node(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let label = text_arg(args, 0, "");
    let weight = number_arg(args, 1, "Node", 0.0)?;
    let id = ctx.next_record_id();
    Ok(Value::Record(Record::node(Node::new(id, label, weight))))
}

fn stream(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let name = text_arg(args, 0, "");
    let id = ctx.next_record_id();
    Ok(Value::Record(Record::stream(Stream::new(id, name))))
}

fn document(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let source = text_arg(args, 0, "");
    let content = text_arg(args, 1, "");
    let id = ctx.next_record_id();
    Ok(Value::Record(Record::document(Document { id, source, content })))
}

fn new_chunk(ctx: &mut dyn HostContext, content: String, index: f64, source: String) -> Value {
    let id = ctx.next_record_id();
    Value::Record(Record::chunk(Chunk {
        id,
        content,
        index,
        source,
    }))
}

fn chunk_record(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let content = text_arg(args, 0, "");
    let index = number_arg(args, 1, "Chunk", 0.0)?.trunc();
    let source = text_arg(args, 2, "");
    Ok(new_chunk(ctx, content, index, source))
}

fn new_embedding(ctx: &mut dyn HostContext, text: &str, model: Option<String>) -> Value {
    let id = ctx.next_record_id();
    Value::Record(Record::embedding(Embedding::new(id, text, model)))
}

fn embedding(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let text = text_arg(args, 0, "");
    let model = optional(args, 1).map(ToString::to_string);
    Ok(new_embedding(ctx, &text, model))
}

fn vector_store(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let name = text_arg(args, 0, DEFAULT_STORE);
    let id = ctx.next_record_id();
    Ok(Value::Record(Record::vector_store(VectorStore::new(id, name))))
}

/// Splits text into chunks of whole words, each at most `size` characters
/// where possible. A word longer than `size` gets a chunk of its own.
fn chunk(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let (text, source) = match &args[0] {
        Value::Record(Record::Document(d)) => {
            let d = d.borrow();
            (d.content.clone(), d.source.clone())
        }
        Value::Text(s) => (s.to_string(), "<string>".to_string()),
        other => {
            return Err(wrong_arg_type(
                "chunk",
                "a Text or Document",
                other.type_name(),
            ))
        }
    };
    let size = match optional(args, 1) {
        Some(v) => usize::try_from(whole(v, "chunk")?).unwrap_or(0),
        None => 512,
    };

    let mut pieces: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count() + 1;
        if current_len + word_len > size && !current.is_empty() {
            pieces.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current.push(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        pieces.push(current.join(" "));
    }

    let chunks = pieces
        .into_iter()
        .zip(0u32..)
        .map(|(content, index)| new_chunk(ctx, content, f64::from(index), source.clone()))
        .collect();
    Ok(Value::list(chunks))
}

fn embed(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let model = optional(args, 1).map(ToString::to_string);
    match &args[0] {
        Value::Text(s) => Ok(new_embedding(ctx, s, model)),
        value @ Value::Record(Record::Chunk(_) | Record::Document(_)) => {
            Ok(new_embedding(ctx, &content_of(value), model))
        }
        Value::List(items) => {
            let items = items.borrow().clone();
            let embeddings = items
                .iter()
                .map(|item| {
                    let text = match item {
                        Value::Record(Record::Chunk(c)) => c.borrow().content.clone(),
                        other => other.to_string(),
                    };
                    new_embedding(ctx, &text, model.clone())
                })
                .collect();
            Ok(Value::list(embeddings))
        }
        other => Err(wrong_arg_type(
            "embed",
            "a Text, Chunk, Document or List",
            other.type_name(),
        )),
    }
}

/// Adds embeddings (or chunks, embedded on the way in) to the run's store
/// called `name` and returns that store. Other items are skipped.
fn store(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let name = text_arg(args, 1, DEFAULT_STORE);
    let store = ctx.named_store(&name);
    let Value::Record(target) = &store else {
        return Ok(store);
    };

    let items = match &args[0] {
        Value::List(items) => items.borrow().clone(),
        single => vec![single.clone()],
    };
    for item in items {
        match item {
            Value::Record(Record::Embedding(e)) => {
                let text = Value::text(e.borrow().text.as_str());
                target.call_method("add", &[Value::Record(Record::Embedding(e)), text])?;
            }
            Value::Record(Record::Chunk(c)) => {
                let content = c.borrow().content.clone();
                let embedding = new_embedding(ctx, &content, None);
                target.call_method("add", &[embedding, Value::text(content)])?;
            }
            _ => {}
        }
    }
    Ok(store)
}

/// `retrieve(query, store_name?, top_k?)`: the closest entries of a store
/// filled by `store`, as `{text, score}` maps.
fn retrieve(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let name = text_arg(args, 1, DEFAULT_STORE);
    let Some(Value::Record(target)) = ctx.find_store(&name) else {
        return Err(EvalError::new(format!("vector store '{name}' not found")));
    };
    let query = Value::text(args[0].to_string());
    let top_k = optional(args, 2).cloned().unwrap_or(Value::Number(3.0));
    target.call_method("search", &[query, top_k])
}

fn vector_of(value: &Value) -> Result<Vec<f64>, EvalError> {
    match value {
        Value::Record(record) => record
            .embedding_vector()
            .ok_or_else(|| wrong_arg_type("cosine_sim", "an Embedding or List", record.type_name())),
        Value::List(items) => items
            .borrow()
            .iter()
            .map(|v| v.expect_number("cosine_sim"))
            .collect(),
        other => Err(wrong_arg_type(
            "cosine_sim",
            "an Embedding or List",
            other.type_name(),
        )),
    }
}

fn cosine_sim(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let a = vector_of(&args[0])?;
    let b = vector_of(&args[1])?;
    Ok(Value::Number(round4(cosine_similarity(&a, &b))))
}

/// Condenses the input into a Thought: the first 200 characters of its
/// text, with confidence growing with the amount of text.
fn think(ctx: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let context = match &args[0] {
        Value::List(items) => {
            let parts: Vec<String> = items.borrow().iter().map(think_part).collect();
            parts.join(" ")
        }
        other => content_of(other),
    };
    let length = count_as_number(context.chars().count());
    let summary: String = context.chars().take(200).collect();
    let confidence = ((0.5 + length / 1000.0).min(0.95) * 100.0).round() / 100.0;

    let id = ctx.next_record_id();
    let mut data = Thought::new(id, summary, confidence);
    data.tags.push("synthesized".to_string());
    data.tags.push("pipeline".to_string());
    if let Some(prompt) = optional(args, 1).filter(|p| p.is_truthy()) {
        data.tags.push(format!("prompt:{prompt}"));
    }
    Ok(Value::Record(Record::thought(data)))
}

/// Text contributed by one retrieved item.
fn think_part(item: &Value) -> String {
    if let Value::Map(map) = item {
        let map = map.borrow();
        if let Some(text) = map.get("text") {
            return text.to_string();
        }
        if let Some(chunk) = map.get("chunk") {
            return content_of(chunk);
        }
    }
    content_of(item)
}

/// A memory's value (counting the recall), or the argument itself.
fn recall(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Record(Record::Memory(m)) => Ok(m.borrow_mut().recall()),
        other => Ok(other.clone()),
    }
}

/// Keyword scoring: each category scores one point per word of it that
/// occurs in the text. The first best-scoring category is the label.
fn classify(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let text = content_of(&args[0]).to_lowercase();
    let mut scores = MapValue::new();
    let mut best: Option<(String, usize)> = None;
    for category in &args[1..] {
        let name = category.to_string();
        let score = name
            .to_lowercase()
            .split_whitespace()
            .filter(|word| text.contains(word))
            .count();
        let better = match &best {
            Some((_, top)) => score > *top,
            None => true,
        };
        if better {
            best = Some((name.clone(), score));
        }
        scores.insert(name, Value::count(score));
    }

    let mut result = MapValue::new();
    let label = best.map_or_else(|| "unknown".to_string(), |(name, _)| name);
    result.insert("label", Value::text(label));
    result.insert("scores", Value::map(scores));
    Ok(Value::map(result))
}

/// Truncates to `max_len` characters, preferring to end at a sentence
/// boundary in the second half of the cut.
fn summarize(_: &mut dyn HostContext, args: &[Value]) -> EvalResult {
    let text = match &args[0] {
        Value::List(items) => {
            let parts: Vec<String> = items.borrow().iter().map(ToString::to_string).collect();
            parts.join(" ")
        }
        other => content_of(other),
    };
    let max_len = match optional(args, 1) {
        Some(v) => usize::try_from(whole(v, "summarize")?).unwrap_or(0),
        None => 100,
    };
    if text.chars().count() <= max_len {
        return Ok(Value::text(text));
    }

    let truncated: String = text.chars().take(max_len).collect();
    if let Some(period) = truncated.rfind('.') {
        let position = truncated[..period].chars().count();
        if position * 2 > max_len {
            return Ok(Value::text(&truncated[..=period]));
        }
    }
    Ok(Value::text(format!("{truncated}...")))
}
