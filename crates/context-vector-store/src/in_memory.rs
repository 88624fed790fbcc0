use crate::adapter::StorageAdapter;
use crate::error::{Result, VectorStoreError};
use crate::types::VectorRecord;
use async_trait::async_trait;
use context_embeddings::cosine_similarity;
use std::collections::HashMap;

pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Reference `StorageAdapter` (spec §4.4): a brute-force, linear-scan
/// cosine index kept entirely in memory. ANN composition on top is the
/// caller's responsibility — this adapter makes no such attempt.
#[derive(Default)]
pub struct InMemoryStorageAdapter {
    records: HashMap<String, VectorRecord>,
    insertion_order: Vec<String>,
    dimension: Option<usize>,
}

impl InMemoryStorageAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl StorageAdapter for InMemoryStorageAdapter {
    async fn store_document(&mut self, record: VectorRecord) -> Result<()> {
        if let Some(expected) = self.dimension {
            if record.embedding.len() != expected {
                return Err(VectorStoreError::DimensionMismatch { expected, actual: record.embedding.len() });
            }
        } else {
            self.dimension = Some(record.embedding.len());
        }

        if !self.records.contains_key(&record.id) {
            self.insertion_order.push(record.id.clone());
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn retrieve_document(&self, id: &str) -> Result<Option<VectorRecord>> {
        Ok(self.records.get(id).cloned())
    }

    async fn find_similar(
        &self,
        query_embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<(VectorRecord, f32)>> {
        if let Some(expected) = self.dimension {
            if query_embedding.len() != expected {
                return Err(VectorStoreError::DimensionMismatch { expected, actual: query_embedding.len() });
            }
        }

        let mut scored: Vec<(VectorRecord, f32)> = self
            .insertion_order
            .iter()
            .filter_map(|id| self.records.get(id))
            .map(|record| (record.clone(), cosine_similarity(query_embedding, &record.embedding)))
            .filter(|(_, score)| *score >= threshold)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn delete_document(&mut self, id: &str) -> Result<()> {
        self.records.remove(id);
        self.insertion_order.retain(|existing| existing != id);
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.insertion_order.clear();
        self.dimension = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec §8 scenario 5.
    #[tokio::test]
    async fn cosine_search_returns_top_two_in_order() {
        let mut store = InMemoryStorageAdapter::new();
        store.store_document(VectorRecord::new("a", "a", vec![1.0, 0.0])).await.unwrap();
        store.store_document(VectorRecord::new("b", "b", vec![0.9, 0.1])).await.unwrap();
        store.store_document(VectorRecord::new("c", "c", vec![0.0, 1.0])).await.unwrap();

        let results = store.find_similar(&[1.0, 0.0], 2, 0.5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.id, "a");
        assert_eq!(results[1].0.id, "b");
    }

    #[tokio::test]
    async fn mismatched_dimension_is_rejected() {
        let mut store = InMemoryStorageAdapter::new();
        store.store_document(VectorRecord::new("a", "a", vec![1.0, 0.0])).await.unwrap();
        let result = store.store_document(VectorRecord::new("b", "b", vec![1.0, 0.0, 0.0])).await;
        assert!(matches!(result, Err(VectorStoreError::DimensionMismatch { .. })));
    }

    #[tokio::test]
    async fn delete_then_retrieve_is_none() {
        let mut store = InMemoryStorageAdapter::new();
        store.store_document(VectorRecord::new("a", "a", vec![1.0, 0.0])).await.unwrap();
        store.delete_document("a").await.unwrap();
        assert!(store.retrieve_document("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_then_retrieve_round_trips() {
        let mut store = InMemoryStorageAdapter::new();
        let record = VectorRecord::new("a", "hello", vec![1.0, 0.0]);
        store.store_document(record.clone()).await.unwrap();
        assert_eq!(store.retrieve_document("a").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let mut store = InMemoryStorageAdapter::new();
        store.store_document(VectorRecord::new("a", "a", vec![1.0, 0.0])).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.is_empty());
    }
}
