//! In-memory vector storage and cosine search (spec §4.4, component C5).

mod adapter;
mod error;
mod in_memory;
mod types;

pub use adapter::StorageAdapter;
pub use error::{Result, VectorStoreError};
pub use in_memory::{InMemoryStorageAdapter, DEFAULT_THRESHOLD};
pub use types::VectorRecord;
