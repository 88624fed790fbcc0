//! Chunker (spec §4.1, component C2). Splits content into retrieval-sized
//! [`Chunk`]s using one of three strategies: fixed-size boundary search,
//! sentence-based semantic splitting, or syntax-tree-aware AST chunking.
//! AST chunking never fails outright — a parse problem or an unsupported
//! language degrades to a single whole-content chunk tagged `fallback`.

mod ast;
mod chunker;
mod config;
mod error;
mod fixed_size;
mod language;
mod semantic;
mod types;

pub use chunker::Chunker;
pub use config::{ChunkerConfig, ChunkingStrategy};
pub use error::{ChunkerError, Result};
pub use language::{language_for_extension, language_for_path, syntax_language};
pub use types::{chunk_id, Chunk, ChunkMetadata, ChunkType};
