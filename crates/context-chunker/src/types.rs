use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A retrieval-unit chunk (spec §3). `start_line`/`end_line` are **0-indexed
/// inclusive** — deliberately not the 1-indexed convention an earlier draft of
/// this chunker used, to match the data model exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(id: String, content: String, metadata: ChunkMetadata) -> Self {
        Self { id, content, metadata }
    }

    pub fn line_count(&self) -> usize {
        self.metadata.end_line.saturating_sub(self.metadata.start_line) + 1
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.metadata.start_line && line <= self.metadata.end_line
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    pub start_line: usize,
    pub end_line: usize,
    pub parent_id: Option<String>,
    pub chunk_type: Option<ChunkType>,
    pub language: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub symbol_name: Option<String>,
    pub qualified_name: Option<String>,
    pub context_imports: Vec<String>,
    pub estimated_tokens: usize,
    /// Set by the AST strategy when parsing failed and it emitted a single
    /// whole-content chunk instead (spec §8 scenario 4).
    pub fallback: bool,
}

impl ChunkMetadata {
    /// Rough heuristic: ~4 chars per token, matching the prompt builder's own
    /// `word_count * 1.3` order of magnitude for code-like text.
    pub fn estimate_tokens_from_content(content: &str) -> usize {
        (content.len() / 4).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ChunkType {
    Function,
    Method,
    Class,
    Struct,
    Enum,
    Interface,
    Module,
    Impl,
    Type,
    Const,
    Variable,
    Import,
    Comment,
    Other,
}

impl ChunkType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChunkType::Function => "function",
            ChunkType::Method => "method",
            ChunkType::Class => "class",
            ChunkType::Struct => "struct",
            ChunkType::Enum => "enum",
            ChunkType::Interface => "interface",
            ChunkType::Module => "module",
            ChunkType::Impl => "impl",
            ChunkType::Type => "type",
            ChunkType::Const => "const",
            ChunkType::Variable => "variable",
            ChunkType::Import => "import",
            ChunkType::Comment => "comment",
            ChunkType::Other => "other",
        }
    }
}

/// Deterministic chunk id: same content + stable index + optional type/
/// filename prefix always yields the same id (spec §3). Not stable under
/// whitespace-equivalent edits — it hashes the content verbatim.
pub fn chunk_id(prefix: Option<&str>, stable_index: usize, content: &str) -> String {
    let mut hasher = Sha256::new();
    if let Some(prefix) = prefix {
        hasher.update(prefix.as_bytes());
        hasher.update(b"\0");
    }
    hasher.update(stable_index.to_le_bytes());
    hasher.update(b"\0");
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
    match prefix {
        Some(prefix) => format!("{prefix}-{stable_index:04x}-{hex}"),
        None => format!("{stable_index:04x}-{hex}"),
    }
}
