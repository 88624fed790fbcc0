use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnippetType {
    Exact,
    Nearby,
    Parent,
    Sibling,
    Related,
}

/// A single gathered slice of local context (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeSnippet {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub relevance: f32,
    pub snippet_type: SnippetType,
}
