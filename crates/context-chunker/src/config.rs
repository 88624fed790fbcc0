use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// The three strategies named in spec §4.1 and collapsed from a deeper
/// inheritance hierarchy per the design notes (§9): a strategy is just
/// `chunk(content, meta, token)`, selected by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkingStrategy {
    FixedSize,
    Semantic,
    Ast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    pub strategy: ChunkingStrategy,
    /// Hard cap on a fixed-size chunk, in characters.
    pub max_chunk_size: usize,
    /// Characters of trailing context copied into the start of the next
    /// fixed-size chunk.
    pub overlap: usize,
    /// Chunks (any strategy) smaller than this many characters are dropped in
    /// AST mode, or never produced as an independent unit in fixed/semantic
    /// mode.
    pub min_chunk_size: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::Semantic,
            max_chunk_size: 2000,
            overlap: 0,
            min_chunk_size: 40,
        }
    }
}

impl ChunkerConfig {
    /// Open question (b): the source's overlap handling could produce
    /// negative progress when `overlap >= max_chunk_size`. This
    /// reimplementation makes the constraint explicit and checked eagerly:
    /// `overlap` must stay strictly below `min_chunk_size`, which guarantees
    /// every fixed-size chunk still advances by at least one "fresh" unit
    /// of content no smaller than the minimum chunk size.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(ChunkerError::InvalidConfig("max_chunk_size must be > 0".to_string()));
        }
        if self.min_chunk_size > self.max_chunk_size {
            return Err(ChunkerError::InvalidConfig(format!(
                "min_chunk_size ({}) cannot exceed max_chunk_size ({})",
                self.min_chunk_size, self.max_chunk_size
            )));
        }
        if self.overlap >= self.min_chunk_size {
            return Err(ChunkerError::InvalidConfig(format!(
                "overlap ({}) must be < min_chunk_size ({})",
                self.overlap, self.min_chunk_size
            )));
        }
        Ok(())
    }
}
