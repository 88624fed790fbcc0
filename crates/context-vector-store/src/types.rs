use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored embedding record (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Value,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self { id: id.into(), content: content.into(), embedding, metadata: Value::Null }
    }
}
