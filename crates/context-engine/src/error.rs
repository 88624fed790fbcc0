use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Aggregates every dependency crate's error type behind one facade error,
/// following the teacher's `IndexerError` convention of a `#[from]` variant
/// per collaborator crate (spec §7).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("chunker error: {0}")]
    Chunker(#[from] context_chunker::ChunkerError),

    #[error(transparent)]
    Embedding(#[from] context_embeddings::EmbeddingError),

    #[error(transparent)]
    VectorStore(#[from] context_vector_store::VectorStoreError),

    #[error(transparent)]
    Gather(#[from] context_gather::GatherError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    #[error("no embedding provider registered and none set as default")]
    NoDefaultProvider,
}
