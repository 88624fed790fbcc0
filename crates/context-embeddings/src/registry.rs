use crate::error::{EmbeddingError, Result};
use crate::provider::EmbeddingProvider;
use context_cancel::{is_cancelled, CancellationToken};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps provider ids to registered [`EmbeddingProvider`]s (spec §4.3,
/// component C4). No cross-provider batching — each call dispatches to
/// exactly one provider.
#[derive(Default)]
pub struct EmbeddingProviderRegistry {
    providers: HashMap<String, Arc<dyn EmbeddingProvider>>,
    default_id: Option<String>,
}

impl EmbeddingProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_provider(&mut self, id: impl Into<String>, provider: Arc<dyn EmbeddingProvider>) {
        self.providers.insert(id.into(), provider);
    }

    pub fn set_default_provider_id(&mut self, id: impl Into<String>) {
        self.default_id = Some(id.into());
    }

    pub fn default_provider_id(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    pub fn has_provider(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Computes embeddings for `texts` with the provider registered under
    /// `id`. Fails with [`EmbeddingError::NoSuchProvider`] for an unknown id.
    /// Cancellation observed before dispatch yields an empty, successful
    /// result; cancellation during the provider's own work is that
    /// provider's responsibility.
    pub async fn compute_embeddings(
        &self,
        id: &str,
        texts: &[String],
        token: Option<&CancellationToken>,
    ) -> Result<Vec<Vec<f32>>> {
        let provider = self
            .providers
            .get(id)
            .ok_or_else(|| EmbeddingError::NoSuchProvider(id.to_string()))?;

        if is_cancelled(token) {
            return Ok(Vec::new());
        }

        Ok(provider.compute_embeddings(texts).await)
    }
}
