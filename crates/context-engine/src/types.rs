use context_chunker::{Chunk, ChunkMetadata, ChunkingStrategy};
use serde::{Deserialize, Serialize};

/// Options accepted by `ContextEngine::index_file`/`index_content` (spec §6).
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Glob patterns a file path must match at least one of, when non-empty.
    pub include_patterns: Vec<String>,
    /// Glob patterns that exclude a file path, checked after `include_patterns`.
    pub exclude_patterns: Vec<String>,
    pub chunking_strategy: ChunkingStrategy,
    /// Embedding provider to use; falls back to the registry's default.
    pub provider_id: Option<String>,
    /// Whether to also run dense (embedding) indexing. `indexFile` callers
    /// that only want sparse/TF-IDF retrieval can set this to `false`.
    pub extract_metadata: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            chunking_strategy: ChunkingStrategy::Semantic,
            provider_id: None,
            extract_metadata: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub top_k: usize,
    pub threshold: f32,
    pub include_similarity: bool,
    pub include_content: bool,
    pub include_metadata: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { top_k: 5, threshold: 0.7, include_similarity: true, include_content: true, include_metadata: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
    pub similarity: Option<f32>,
    pub content: Option<String>,
    pub metadata: Option<ChunkMetadata>,
}

/// Per-file failure recorded by a batch indexing call (spec §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// Result of a multi-file indexing call (spec §7): individual file failures
/// never abort the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexingResult {
    pub files_processed: usize,
    pub chunks_created: usize,
    pub errors: Vec<FileError>,
}

impl IndexingResult {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single file handed to a batch indexing call: its repository-relative
/// (or absolute) path and its already-read content.
#[derive(Debug, Clone)]
pub struct FileToIndex {
    pub path: String,
    pub content: String,
}

pub(crate) fn matches_patterns(path: &str, include: &[String], exclude: &[String]) -> crate::error::Result<bool> {
    if !exclude.is_empty() {
        let set = build_glob_set(exclude)?;
        if set.is_match(path) {
            return Ok(false);
        }
    }
    if !include.is_empty() {
        let set = build_glob_set(include)?;
        return Ok(set.is_match(path));
    }
    Ok(true)
}

fn build_glob_set(patterns: &[String]) -> crate::error::Result<globset::GlobSet> {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(globset::Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Re-exported so callers can construct [`Chunk`]/[`ChunkMetadata`] values
/// without depending on `context-chunker` directly for the common case.
pub type EngineChunk = Chunk;
pub type EngineChunkMetadata = ChunkMetadata;
