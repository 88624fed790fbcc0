use async_trait::async_trait;

/// Contract an embedding backend must satisfy (spec §4.3, §6). Implementations
/// live outside this crate — concrete model transport is explicitly out of
/// scope here.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn dimensions(&self) -> usize;
    fn model_name(&self) -> &str;
    async fn compute_embeddings(&self, texts: &[String]) -> Vec<Vec<f32>>;
}
