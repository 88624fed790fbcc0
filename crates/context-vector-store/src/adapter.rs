use crate::error::Result;
use crate::types::VectorRecord;
use async_trait::async_trait;

/// Storage adapter contract (spec §6). Pluggable adapters (on-disk, remote
/// KV) must preserve the reference adapter's semantics: the same dimension
/// and threshold rules, the same stable ordering of `find_similar` results.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    async fn store_document(&mut self, record: VectorRecord) -> Result<()>;
    async fn retrieve_document(&self, id: &str) -> Result<Option<VectorRecord>>;
    /// Cosine-similarity search against every stored record, filtered to
    /// `>= threshold`, sorted by descending similarity (ties broken by
    /// insertion order), truncated to `limit`.
    async fn find_similar(
        &self,
        query_embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<(VectorRecord, f32)>>;
    async fn delete_document(&mut self, id: &str) -> Result<()>;
    async fn clear(&mut self) -> Result<()>;
}
