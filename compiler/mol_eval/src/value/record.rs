//! Domain records.
//!
//! Structured values built by the standard library constructors
//! (`Thought(..)`, `Node(..)`, ...). The evaluator treats them uniformly
//! through [`Record`]: a type name, a textual form, fields and methods.
//! Records are shared by reference like lists and maps.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHasher;

use super::{count_as_number, py_float, MapValue, Value};
use crate::errors::{
    arity_mismatch, no_such_method, undefined_field, wrong_arg_type, EvalError,
};

/// Dimensions of a simulated embedding vector.
pub const EMBEDDING_DIMENSIONS: usize = 64;

const DEFAULT_MODEL: &str = "mol-sim-v1";

pub struct Thought {
    pub id: u32,
    pub content: String,
    pub confidence: f64,
    pub tags: Vec<String>,
    pub linked: Vec<Record>,
}

impl Thought {
    pub fn new(id: u32, content: String, confidence: f64) -> Self {
        Thought {
            id,
            content,
            confidence: confidence.clamp(0.0, 1.0),
            tags: Vec::new(),
            linked: Vec::new(),
        }
    }
}

pub struct Memory {
    pub id: u32,
    pub key: String,
    pub value: Value,
    pub strength: f64,
    pub recall_count: u32,
}

impl Memory {
    pub fn new(id: u32, key: String, value: Value) -> Self {
        Memory {
            id,
            key,
            value,
            strength: 1.0,
            recall_count: 0,
        }
    }

    pub fn recall(&mut self) -> Value {
        self.recall_count += 1;
        self.strength = (self.strength + 0.1).min(1.0);
        self.value.clone()
    }
}

pub struct Node {
    pub id: u32,
    pub label: String,
    pub weight: f64,
    pub active: bool,
    pub generation: u32,
    pub connections: Vec<Record>,
}

impl Node {
    pub fn new(id: u32, label: String, weight: f64) -> Self {
        Node {
            id,
            label,
            weight,
            active: false,
            generation: 0,
            connections: Vec::new(),
        }
    }

    pub fn evolve(&mut self, factor: f64) {
        self.weight *= factor;
        self.generation += 1;
    }
}

pub struct Stream {
    pub id: u32,
    pub name: String,
    pub buffer: Vec<Value>,
    pub synced: bool,
}

impl Stream {
    pub fn new(id: u32, name: String) -> Self {
        Stream {
            id,
            name,
            buffer: Vec::new(),
            synced: false,
        }
    }
}

pub struct Document {
    pub id: u32,
    pub source: String,
    pub content: String,
}

pub struct Chunk {
    pub id: u32,
    pub content: String,
    pub index: f64,
    pub source: String,
}

pub struct Embedding {
    pub id: u32,
    pub text: String,
    pub model: String,
    pub vector: Vec<f64>,
}

impl Embedding {
    pub fn new(id: u32, text: &str, model: Option<String>) -> Self {
        Embedding {
            id,
            text: text.chars().take(80).collect(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            vector: embed_vector(text),
        }
    }
}

struct StoreEntry {
    embedding: Rc<RefCell<Embedding>>,
    text: String,
}

pub struct VectorStore {
    pub id: u32,
    pub name: String,
    entries: Vec<StoreEntry>,
}

impl VectorStore {
    pub fn new(id: u32, name: String) -> Self {
        VectorStore {
            id,
            name,
            entries: Vec::new(),
        }
    }

    /// The `top_k` most similar entries, best first.
    pub fn search(&self, query: &[f64], top_k: usize) -> Vec<(String, f64)> {
        let mut hits: Vec<(String, f64)> = self
            .entries
            .iter()
            .map(|e| {
                let score = round4(cosine_similarity(query, &e.embedding.borrow().vector));
                (e.text.clone(), score)
            })
            .collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(top_k);
        hits
    }
}

/// Deterministic pseudo-embedding: equal text gives an equal unit vector.
pub fn embed_vector(text: &str) -> Vec<f64> {
    let raw: Vec<f64> = (0..EMBEDDING_DIMENSIONS)
        .map(|i| {
            let mut hasher = FxHasher::default();
            text.hash(&mut hasher);
            i.hash(&mut hasher);
            f64::from(hasher.finish().to_le_bytes()[0]) / 255.0
        })
        .collect();
    let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        raw.into_iter().map(|v| v / norm).collect()
    } else {
        raw
    }
}

pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Round to four decimal places, as similarity scores are reported.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// A shared handle to one domain record.
#[derive(Clone)]
pub enum Record {
    Thought(Rc<RefCell<Thought>>),
    Memory(Rc<RefCell<Memory>>),
    Node(Rc<RefCell<Node>>),
    Stream(Rc<RefCell<Stream>>),
    Document(Rc<RefCell<Document>>),
    Chunk(Rc<RefCell<Chunk>>),
    Embedding(Rc<RefCell<Embedding>>),
    VectorStore(Rc<RefCell<VectorStore>>),
}

/// Every record type name, as accepted by typed `let`.
pub const RECORD_TYPE_NAMES: &[&str] = &[
    "Thought",
    "Memory",
    "Node",
    "Stream",
    "Document",
    "Chunk",
    "Embedding",
    "VectorStore",
];

fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

impl Record {
    pub fn thought(data: Thought) -> Self {
        Record::Thought(shared(data))
    }

    pub fn memory(data: Memory) -> Self {
        Record::Memory(shared(data))
    }

    pub fn node(data: Node) -> Self {
        Record::Node(shared(data))
    }

    pub fn stream(data: Stream) -> Self {
        Record::Stream(shared(data))
    }

    pub fn document(data: Document) -> Self {
        Record::Document(shared(data))
    }

    pub fn chunk(data: Chunk) -> Self {
        Record::Chunk(shared(data))
    }

    pub fn embedding(data: Embedding) -> Self {
        Record::Embedding(shared(data))
    }

    pub fn vector_store(data: VectorStore) -> Self {
        Record::VectorStore(shared(data))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Record::Thought(_) => "Thought",
            Record::Memory(_) => "Memory",
            Record::Node(_) => "Node",
            Record::Stream(_) => "Stream",
            Record::Document(_) => "Document",
            Record::Chunk(_) => "Chunk",
            Record::Embedding(_) => "Embedding",
            Record::VectorStore(_) => "VectorStore",
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Record::Thought(r) => r.borrow().id,
            Record::Memory(r) => r.borrow().id,
            Record::Node(r) => r.borrow().id,
            Record::Stream(r) => r.borrow().id,
            Record::Document(r) => r.borrow().id,
            Record::Chunk(r) => r.borrow().id,
            Record::Embedding(r) => r.borrow().id,
            Record::VectorStore(r) => r.borrow().id,
        }
    }

    fn id_text(&self) -> String {
        format!("{:08x}", self.id())
    }

    pub fn ptr_eq(&self, other: &Record) -> bool {
        match (self, other) {
            (Record::Thought(a), Record::Thought(b)) => Rc::ptr_eq(a, b),
            (Record::Memory(a), Record::Memory(b)) => Rc::ptr_eq(a, b),
            (Record::Node(a), Record::Node(b)) => Rc::ptr_eq(a, b),
            (Record::Stream(a), Record::Stream(b)) => Rc::ptr_eq(a, b),
            (Record::Document(a), Record::Document(b)) => Rc::ptr_eq(a, b),
            (Record::Chunk(a), Record::Chunk(b)) => Rc::ptr_eq(a, b),
            (Record::Embedding(a), Record::Embedding(b)) => Rc::ptr_eq(a, b),
            (Record::VectorStore(a), Record::VectorStore(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Textual form, e.g. `<Node:0000000a "core" w=0.50 idle gen=0>`.
    pub fn repr(&self) -> String {
        let id = self.id_text();
        match self {
            Record::Thought(r) => {
                let t = r.borrow();
                format!(
                    "<Thought:{id} \"{}\" conf={}>",
                    t.content,
                    py_float(t.confidence)
                )
            }
            Record::Memory(r) => {
                let m = r.borrow();
                format!("<Memory:{id} key=\"{}\" strength={:.2}>", m.key, m.strength)
            }
            Record::Node(r) => {
                let n = r.borrow();
                let state = if n.active { "active" } else { "idle" };
                format!(
                    "<Node:{id} \"{}\" w={:.2} {state} gen={}>",
                    n.label, n.weight, n.generation
                )
            }
            Record::Stream(r) => {
                let s = r.borrow();
                let synced = if s.synced { "synced" } else { "unsynced" };
                format!(
                    "<Stream:{id} \"{}\" buf={} {synced}>",
                    s.name,
                    s.buffer.len()
                )
            }
            Record::Document(r) => {
                let d = r.borrow();
                let size = d.content.len();
                let size_text = if size > 1024 {
                    format!("{:.1}KB", count_as_number(size) / 1024.0)
                } else {
                    format!("{size}B")
                };
                format!("<Document:{id} \"{}\" {size_text}>", d.source)
            }
            Record::Chunk(r) => {
                let c = r.borrow();
                let mut preview: String = c.content.chars().take(30).collect();
                if c.content.chars().count() > 30 {
                    preview.push_str("...");
                }
                let preview = preview.replace('\n', " ");
                format!("<Chunk:{id} #{} \"{preview}\">", c.index)
            }
            Record::Embedding(r) => {
                let e = r.borrow();
                format!(
                    "<Embedding:{id} dim={} model=\"{}\">",
                    e.vector.len(),
                    e.model
                )
            }
            Record::VectorStore(r) => {
                let v = r.borrow();
                format!(
                    "<VectorStore:{id} \"{}\" {} vectors>",
                    v.name,
                    v.entries.len()
                )
            }
        }
    }

    /// Read a field.
    pub fn field(&self, name: &str) -> Result<Value, EvalError> {
        if name == "id" {
            return Ok(Value::text(self.id_text()));
        }
        let value = match self {
            Record::Thought(r) => {
                let t = r.borrow();
                match name {
                    "content" => Some(Value::text(t.content.as_str())),
                    "confidence" => Some(Value::Number(t.confidence)),
                    "tags" => Some(Value::list(
                        t.tags.iter().map(|s| Value::text(s.as_str())).collect(),
                    )),
                    "linked" => Some(Value::list(
                        t.linked.iter().cloned().map(Value::Record).collect(),
                    )),
                    _ => None,
                }
            }
            Record::Memory(r) => {
                let m = r.borrow();
                match name {
                    "key" => Some(Value::text(m.key.as_str())),
                    "value" => Some(m.value.clone()),
                    "strength" => Some(Value::Number(m.strength)),
                    "recall_count" => Some(Value::Number(f64::from(m.recall_count))),
                    _ => None,
                }
            }
            Record::Node(r) => {
                let n = r.borrow();
                match name {
                    "label" => Some(Value::text(n.label.as_str())),
                    "weight" => Some(Value::Number(n.weight)),
                    "active" => Some(Value::Bool(n.active)),
                    "generation" => Some(Value::Number(f64::from(n.generation))),
                    "connections" => Some(Value::list(
                        n.connections.iter().cloned().map(Value::Record).collect(),
                    )),
                    _ => None,
                }
            }
            Record::Stream(r) => {
                let s = r.borrow();
                match name {
                    "name" => Some(Value::text(s.name.as_str())),
                    "buffer" => Some(Value::list(s.buffer.clone())),
                    "synced" => Some(Value::Bool(s.synced)),
                    _ => None,
                }
            }
            Record::Document(r) => {
                let d = r.borrow();
                match name {
                    "source" => Some(Value::text(d.source.as_str())),
                    "content" => Some(Value::text(d.content.as_str())),
                    "size" => Some(Value::Number(count_as_number(d.content.len()))),
                    _ => None,
                }
            }
            Record::Chunk(r) => {
                let c = r.borrow();
                match name {
                    "content" => Some(Value::text(c.content.as_str())),
                    "index" => Some(Value::Number(c.index)),
                    "source" => Some(Value::text(c.source.as_str())),
                    _ => None,
                }
            }
            Record::Embedding(r) => {
                let e = r.borrow();
                match name {
                    "text" => Some(Value::text(e.text.as_str())),
                    "model" => Some(Value::text(e.model.as_str())),
                    "dimensions" => Some(Value::Number(count_as_number(e.vector.len()))),
                    "vector" => Some(Value::list(
                        e.vector.iter().copied().map(Value::Number).collect(),
                    )),
                    _ => None,
                }
            }
            Record::VectorStore(r) => {
                let v = r.borrow();
                match name {
                    "name" => Some(Value::text(v.name.as_str())),
                    "count" => Some(Value::Number(count_as_number(v.entries.len()))),
                    _ => None,
                }
            }
        };
        value.ok_or_else(|| undefined_field(name, self.type_name()))
    }

    /// Write a field. Only plain data fields are writable.
    pub fn set_field(&self, name: &str, value: Value) -> Result<(), EvalError> {
        let type_name = self.type_name();
        let text = |v: &Value| v.expect_text(name).map(str::to_string);
        match (self, name) {
            (Record::Thought(r), "content") => r.borrow_mut().content = text(&value)?,
            (Record::Thought(r), "confidence") => {
                r.borrow_mut().confidence = value.expect_number(name)?.clamp(0.0, 1.0);
            }
            (Record::Memory(r), "key") => r.borrow_mut().key = text(&value)?,
            (Record::Memory(r), "value") => r.borrow_mut().value = value,
            (Record::Memory(r), "strength") => r.borrow_mut().strength = value.expect_number(name)?,
            (Record::Node(r), "label") => r.borrow_mut().label = text(&value)?,
            (Record::Node(r), "weight") => r.borrow_mut().weight = value.expect_number(name)?,
            (Record::Node(r), "active") => r.borrow_mut().active = value.is_truthy(),
            (Record::Stream(r), "name") => r.borrow_mut().name = text(&value)?,
            (Record::Document(r), "source") => r.borrow_mut().source = text(&value)?,
            (Record::Document(r), "content") => r.borrow_mut().content = text(&value)?,
            (Record::Chunk(r), "content") => r.borrow_mut().content = text(&value)?,
            (Record::Chunk(r), "index") => r.borrow_mut().index = value.expect_number(name)?,
            (Record::Chunk(r), "source") => r.borrow_mut().source = text(&value)?,
            (Record::VectorStore(r), "name") => r.borrow_mut().name = text(&value)?,
            _ => {
                return Err(EvalError::new(format!(
                    "cannot set field '{name}' on {type_name}"
                )))
            }
        }
        Ok(())
    }

    /// Field map used by `inspect` and `to_json`.
    pub fn to_map(&self) -> MapValue {
        let mut map = MapValue::new();
        map.insert("id", Value::text(self.id_text()));
        let fields: &[&str] = match self {
            Record::Thought(_) => &["content", "confidence", "tags"],
            Record::Memory(_) => &["key", "value", "strength"],
            Record::Node(_) => &["label", "weight", "active", "generation"],
            Record::Stream(_) => &["name", "synced"],
            Record::Document(_) => &["source", "size"],
            Record::Chunk(_) => &["content", "index", "source"],
            Record::Embedding(_) => &["text", "model", "dimensions"],
            Record::VectorStore(_) => &["name", "count"],
        };
        for &field in fields {
            if let Ok(value) = self.field(field) {
                map.insert(field, value);
            }
        }
        if let Record::Stream(r) = self {
            map.insert(
                "buffer_size",
                Value::Number(count_as_number(r.borrow().buffer.len())),
            );
        }
        map
    }

    /// The vector of an embedding record.
    pub fn embedding_vector(&self) -> Option<Vec<f64>> {
        match self {
            Record::Embedding(e) => Some(e.borrow().vector.clone()),
            _ => None,
        }
    }

    /// Invoke a record method. Methods that mutate return the record itself
    /// so calls chain.
    pub fn call_method(&self, method: &str, args: &[Value]) -> Result<Value, EvalError> {
        let this = || Value::Record(self.clone());
        match (self, method) {
            (Record::Thought(r), "tag") => {
                let tags: Vec<String> = args.iter().map(ToString::to_string).collect();
                r.borrow_mut().tags.extend(tags);
                Ok(this())
            }
            (Record::Thought(r), "link") => {
                check_args(method, args, 1, 1)?;
                let other = expect_record(method, &args[0], "Thought")?;
                r.borrow_mut().linked.push(other);
                Ok(this())
            }
            (Record::Memory(r), "recall") => {
                check_args(method, args, 0, 0)?;
                Ok(r.borrow_mut().recall())
            }
            (Record::Memory(r), "decay") => {
                check_args(method, args, 0, 1)?;
                let amount = match args.first() {
                    Some(v) => v.expect_number(method)?,
                    None => 0.05,
                };
                let mut memory = r.borrow_mut();
                memory.strength = (memory.strength - amount).max(0.0);
                Ok(this())
            }
            (Record::Node(r), "connect") => {
                check_args(method, args, 1, 1)?;
                let other = expect_record(method, &args[0], "Node")?;
                r.borrow_mut().connections.push(other);
                Ok(this())
            }
            (Record::Node(r), "activate" | "deactivate") => {
                check_args(method, args, 0, 0)?;
                r.borrow_mut().active = method == "activate";
                Ok(this())
            }
            (Record::Node(r), "evolve") => {
                check_args(method, args, 0, 1)?;
                let factor = match args.first() {
                    Some(v) => v.expect_number(method)?,
                    None => 1.1,
                };
                r.borrow_mut().evolve(factor);
                Ok(this())
            }
            (Record::Stream(r), "emit") => {
                check_args(method, args, 1, 1)?;
                r.borrow_mut().buffer.push(args[0].clone());
                Ok(this())
            }
            (Record::Stream(r), "sync") => {
                check_args(method, args, 0, 0)?;
                r.borrow_mut().synced = true;
                Ok(this())
            }
            (Record::Stream(r), "consume") => {
                check_args(method, args, 0, 0)?;
                let drained = std::mem::take(&mut r.borrow_mut().buffer);
                Ok(Value::list(drained))
            }
            (Record::VectorStore(r), "add") => {
                check_args(method, args, 1, 2)?;
                let Value::Record(Record::Embedding(embedding)) = &args[0] else {
                    return Err(wrong_arg_type(
                        method,
                        "an Embedding",
                        args[0].type_name(),
                    ));
                };
                let text = match args.get(1) {
                    Some(v) => v.to_string(),
                    None => embedding.borrow().text.clone(),
                };
                r.borrow_mut().entries.push(StoreEntry {
                    embedding: Rc::clone(embedding),
                    text,
                });
                Ok(this())
            }
            (Record::VectorStore(r), "search") => {
                check_args(method, args, 1, 2)?;
                let query = match &args[0] {
                    Value::Record(rec) => rec
                        .embedding_vector()
                        .unwrap_or_else(|| embed_vector(&rec.repr())),
                    other => embed_vector(&other.to_string()),
                };
                let top_k = match args.get(1) {
                    Some(v) => v.expect_index(method)?,
                    None => 3,
                };
                let hits = r
                    .borrow()
                    .search(&query, top_k)
                    .into_iter()
                    .map(|(text, score)| {
                        let mut hit = MapValue::new();
                        hit.insert("text", Value::text(text));
                        hit.insert("score", Value::Number(score));
                        Value::map(hit)
                    })
                    .collect();
                Ok(Value::list(hits))
            }
            (Record::Embedding(r), "similarity") => {
                check_args(method, args, 1, 1)?;
                let other = expect_record(method, &args[0], "Embedding")?;
                let other = other.embedding_vector().unwrap_or_default();
                Ok(Value::Number(round4(cosine_similarity(
                    &r.borrow().vector,
                    &other,
                ))))
            }
            _ => Err(no_such_method(method, self.type_name())),
        }
    }
}

fn check_args(method: &str, args: &[Value], min: usize, max: usize) -> Result<(), EvalError> {
    if args.len() < min || args.len() > max {
        return Err(arity_mismatch(method, min, Some(max), args.len()));
    }
    Ok(())
}

fn expect_record(method: &str, value: &Value, type_name: &str) -> Result<Record, EvalError> {
    match value {
        Value::Record(r) if r.type_name() == type_name => Ok(r.clone()),
        other => Err(wrong_arg_type(
            method,
            &format!("a {type_name}"),
            other.type_name(),
        )),
    }
}

#[cfg(test)]
mod tests;
