//! Public orchestrator facade (spec §6, component C12). Wires a chunker, an
//! embedding provider registry, a vector store, a sparse index, a local
//! gatherer, and a result cache behind three operations: `index_file` (and
//! its batch/content variants), `search`, and `build_prompt`, plus
//! `gather_context` for standalone cursor-local snippet gathering.
//!
//! `index_file` → chunk → embed → store. `search` → embed query → vector
//! top-K (+ TF-IDF merge) → rank → return. `build_prompt` → search → format.

pub mod discovery;
mod error;
mod types;

pub use error::{EngineError, Result};
pub use types::{
    FileError, FileToIndex, IndexOptions, IndexingResult, SearchOptions, SearchResult,
};

use context_cache::{Cache, CachePolicy};
use context_cancel::{is_cancelled, CancellationToken};
use context_chunker::{language_for_path, Chunk, ChunkMetadata, Chunker, ChunkerConfig, ChunkingStrategy};
use context_embeddings::EmbeddingProvider;
use context_embeddings::EmbeddingProviderRegistry;
use context_gather::{CodeSnippet, GatherOptions, LocalContextGatherer, Position, StringModel};
use context_prompt::{build_prompt as assemble_prompt, ModelCapabilities, PromptResult, PromptSnippet, WordCountEstimator};
use context_rank::{rank, FactorWeights, NormalizationStrategy, RankConfig, ScoreFactors};
use context_sparse_index::SparseIndex;
use context_vector_store::{InMemoryStorageAdapter, StorageAdapter, VectorRecord};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The engine's public facade. Owns every in-process collaborator named in
/// spec §2's composition note; a caller wires embedding providers and an
/// optional AST parser before indexing anything.
pub struct ContextEngine {
    base_chunker_config: ChunkerConfig,
    fixed_chunker: Chunker,
    semantic_chunker: Chunker,
    ast_chunker: Option<Chunker>,
    sparse_index: SparseIndex,
    vector_store: Box<dyn StorageAdapter>,
    embeddings: EmbeddingProviderRegistry,
    /// Authoritative chunk content/metadata by id — the sparse index only
    /// keeps term statistics, and the vector store is populated only when
    /// dense indexing succeeds, so the engine keeps its own copy.
    chunks: HashMap<String, Chunk>,
    /// Document key (file path, or a generated key for `index_content`) to
    /// the ordered chunk ids currently indexed under it, for deletion.
    document_chunks: HashMap<String, Vec<String>>,
    /// Every currently-indexed chunk id in insertion order, with no
    /// duplicates. `search`'s candidate list is built by walking this
    /// instead of draining a `HashSet`, so ties at the rank/trim boundary
    /// resolve by insertion order (spec §5) instead of hash-iteration order.
    chunk_order: Vec<String>,
    /// Local-context gatherer (spec §2's composition note, component C6):
    /// owns its own `(languageId, line, column)` snippet cache.
    gatherer: LocalContextGatherer,
    /// Short-term result cache (component C11) keyed by a query signature;
    /// spec §5 names this and the gatherer cache as the engine's only other
    /// shared mutable state besides the sparse index and vector store.
    result_cache: Cache<String, Vec<SearchResult>>,
}

impl Default for ContextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextEngine {
    pub fn new() -> Self {
        Self::with_chunker_config(ChunkerConfig::default()).expect("default chunker config is valid")
    }

    /// Construct with caller-supplied chunking tunables (`max_chunk_size`,
    /// `overlap`, `min_chunk_size`); `config.strategy` is ignored here since
    /// the engine keeps one chunker ready per strategy and dispatches by
    /// [`IndexOptions::chunking_strategy`] per call.
    pub fn with_chunker_config(config: ChunkerConfig) -> Result<Self> {
        let fixed_chunker = Chunker::new(ChunkerConfig { strategy: ChunkingStrategy::FixedSize, ..config.clone() })?;
        let semantic_chunker = Chunker::new(ChunkerConfig { strategy: ChunkingStrategy::Semantic, ..config.clone() })?;

        Ok(Self {
            base_chunker_config: config,
            fixed_chunker,
            semantic_chunker,
            ast_chunker: None,
            sparse_index: SparseIndex::new(),
            vector_store: Box::new(InMemoryStorageAdapter::new()),
            embeddings: EmbeddingProviderRegistry::new(),
            chunks: HashMap::new(),
            document_chunks: HashMap::new(),
            chunk_order: Vec::new(),
            gatherer: LocalContextGatherer::new(),
            result_cache: Cache::new(CachePolicy::default()),
        })
    }

    /// Swaps in a different storage adapter (spec §6's storage adapter
    /// contract). Must be called before any indexing to take effect cleanly.
    pub fn with_storage_adapter(mut self, adapter: Box<dyn StorageAdapter>) -> Self {
        self.vector_store = adapter;
        self
    }

    pub fn register_embedding_provider(&mut self, id: impl Into<String>, provider: Arc<dyn EmbeddingProvider>) {
        self.embeddings.register_provider(id, provider);
    }

    pub fn set_default_provider_id(&mut self, id: impl Into<String>) {
        self.embeddings.set_default_provider_id(id);
    }

    /// Enables the AST chunking strategy. Until this is called, requesting
    /// [`ChunkingStrategy::Ast`] silently degrades to `Semantic` — mirrors
    /// spec §6's "`registerASTParser` enables the syntax-tree chunking
    /// strategy": without a registered parser there is nothing to chunk
    /// with structurally.
    pub fn register_ast_parser(&mut self) -> Result<()> {
        let config = ChunkerConfig { strategy: ChunkingStrategy::Ast, ..self.base_chunker_config.clone() };
        self.ast_chunker = Some(Chunker::new(config)?);
        Ok(())
    }

    fn chunker_for(&mut self, strategy: ChunkingStrategy) -> &mut Chunker {
        match strategy {
            ChunkingStrategy::FixedSize => &mut self.fixed_chunker,
            ChunkingStrategy::Semantic => &mut self.semantic_chunker,
            ChunkingStrategy::Ast => self.ast_chunker.as_mut().unwrap_or(&mut self.semantic_chunker),
        }
    }

    /// Indexes `content` under `path`: chunks it with `options.chunking_strategy`,
    /// updates the sparse index, and (when `options.extract_metadata` and a
    /// provider is available) embeds and stores each chunk densely. Returns
    /// the chunks produced, in source order, even if dense indexing is
    /// skipped entirely.
    pub async fn index_file(
        &mut self,
        path: &str,
        content: &str,
        options: &IndexOptions,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<Chunk>> {
        if !types_matches(path, options)? {
            return Ok(Vec::new());
        }

        let language = language_for_path(path);
        let chunker = self.chunker_for(options.chunking_strategy);
        let chunks = chunker.chunk_with_language(content, language, Some(path), token);

        self.index_chunks(path, chunks.clone(), options, token).await?;
        Ok(chunks)
    }

    /// Indexes `content` as a single retrieval unit, bypassing strategy
    /// dispatch (spec §6: `indexContent` returns `Chunk | null`, a single
    /// value, not a list). Returns `None` when cancelled before indexing or
    /// given empty content.
    pub async fn index_content(
        &mut self,
        content: &str,
        metadata: Option<ChunkMetadata>,
        options: &IndexOptions,
        token: Option<&CancellationToken>,
    ) -> Result<Option<Chunk>> {
        if content.is_empty() || is_cancelled(token) {
            return Ok(None);
        }

        let mut metadata = metadata.unwrap_or_default();
        if metadata.estimated_tokens == 0 {
            metadata.estimated_tokens = ChunkMetadata::estimate_tokens_from_content(content);
        }
        if metadata.end_line == 0 && metadata.start_line == 0 {
            metadata.end_line = content.matches('\n').count();
        }

        let key = metadata.file_path.clone().unwrap_or_else(|| context_chunker::chunk_id(None, 0, content));
        let id = context_chunker::chunk_id(metadata.file_path.as_deref(), 0, content);
        let chunk = Chunk::new(id, content.to_string(), metadata);

        self.index_chunks(&key, vec![chunk.clone()], options, token).await?;
        Ok(Some(chunk))
    }

    /// Batch indexing over many files (spec §7): individual failures are
    /// recorded in `errors` and never abort the remaining files.
    pub async fn index_files(
        &mut self,
        files: Vec<FileToIndex>,
        options: &IndexOptions,
        token: Option<&CancellationToken>,
    ) -> IndexingResult {
        let mut result = IndexingResult::new();

        for file in files {
            if is_cancelled(token) {
                break;
            }
            match self.index_file(&file.path, &file.content, options, token).await {
                Ok(chunks) => {
                    result.files_processed += 1;
                    result.chunks_created += chunks.len();
                }
                Err(e) => {
                    log::warn!("failed to index {}: {e}", file.path);
                    result.errors.push(FileError { file: file.path, error: e.to_string() });
                }
            }
        }

        result
    }

    /// Removes every chunk and vector record indexed under `key` (spec §3's
    /// lifecycle note: chunks and vector records are destroyed together by
    /// `deleteDocument`). A no-op for an unknown key.
    pub async fn delete_document(&mut self, key: &str) -> Result<()> {
        self.sparse_index.delete_document(key);
        if let Some(ids) = self.document_chunks.remove(key) {
            for id in &ids {
                self.chunks.remove(id);
                self.vector_store.delete_document(id).await?;
            }
            let removed: HashSet<&String> = ids.iter().collect();
            self.chunk_order.retain(|id| !removed.contains(id));
        }
        // The corpus changed; any cached search result may now be stale.
        self.result_cache.clear();
        Ok(())
    }

    async fn index_chunks(
        &mut self,
        key: &str,
        chunks: Vec<Chunk>,
        options: &IndexOptions,
        token: Option<&CancellationToken>,
    ) -> Result<()> {
        self.delete_document(key).await?;

        let pairs: Vec<(String, String)> = chunks.iter().map(|c| (c.id.clone(), c.content.clone())).collect();
        self.sparse_index.update_documents(key, &pairs);

        let mut ids = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            ids.push(chunk.id.clone());
            self.chunks.insert(chunk.id.clone(), chunk.clone());
            self.chunk_order.push(chunk.id.clone());
        }
        self.document_chunks.insert(key.to_string(), ids);

        if options.extract_metadata && !chunks.is_empty() {
            self.embed_and_store(&chunks, options.provider_id.as_deref(), token).await?;
        }

        Ok(())
    }

    async fn embed_and_store(
        &mut self,
        chunks: &[Chunk],
        provider_id: Option<&str>,
        token: Option<&CancellationToken>,
    ) -> Result<()> {
        let Some(provider_id) = provider_id.map(str::to_string).or_else(|| self.embeddings.default_provider_id().map(str::to_string)) else {
            log::debug!("no embedding provider configured; skipping dense indexing for this batch");
            return Ok(());
        };

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embeddings.compute_embeddings(&provider_id, &texts, token).await?;

        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            let metadata = serde_json::json!({
                "provider_id": provider_id,
                "chunk_metadata": chunk.metadata,
            });
            let record = VectorRecord { id: chunk.id.clone(), content: chunk.content.clone(), embedding, metadata };
            self.vector_store.store_document(record).await?;
        }

        Ok(())
    }

    /// Multi-factor search (spec §4.6, §6): merges sparse TF-IDF candidates
    /// with dense cosine candidates (when an embedding provider is
    /// available), scores every candidate across the five built-in factors,
    /// and returns the top `options.top_k` by descending rank score.
    pub async fn search(
        &mut self,
        query: &str,
        options: &SearchOptions,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<SearchResult>> {
        if self.chunks.is_empty() || is_cancelled(token) {
            return Ok(Vec::new());
        }

        let cache_key = search_cache_key(query, options);
        if let Some(cached) = self.result_cache.get(&cache_key) {
            return Ok(cached.clone());
        }

        let query_weights = context_query::weights(query);
        let candidate_width = (options.top_k as u32 * query_weights.candidate_multiplier).max(options.top_k as u32) as usize;

        let sparse_scores = self.sparse_index.search(query, token);
        let normalized_sparse = context_sparse_index::normalize(sparse_scores);
        let sparse_map: HashMap<String, f32> =
            normalized_sparse.iter().map(|s| (s.chunk_id.clone(), s.score as f32)).collect();

        let mut dense_similarity: HashMap<String, f32> = HashMap::new();
        if let Some(provider_id) =
            self.embeddings.default_provider_id().map(str::to_string).filter(|id| self.embeddings.has_provider(id))
        {
            let query_embedding = self.embeddings.compute_embeddings(&provider_id, &[query.to_string()], token).await?;
            if let Some(embedding) = query_embedding.into_iter().next() {
                let found = self.vector_store.find_similar(&embedding, candidate_width, options.threshold).await?;
                for (record, similarity) in found {
                    dense_similarity.insert(record.id, similarity);
                }
            }
        }

        // Walk `chunk_order` (insertion order, no duplicates) rather than
        // draining a `HashSet`, so ties at the rank/trim boundary resolve
        // deterministically by insertion order (spec §5) instead of
        // HashMap's randomized iteration order.
        let any_merge_hit = !sparse_map.is_empty() || !dense_similarity.is_empty();
        let candidates: Vec<String> = self
            .chunk_order
            .iter()
            .filter(|id| !any_merge_hit || sparse_map.contains_key(*id) || dense_similarity.contains_key(*id))
            .cloned()
            .collect();

        let rank_config = RankConfig {
            weights: FactorWeights {
                tf_idf: 1.0,
                fuzzy: query_weights.fuzzy,
                proximity: 0.0,
                semantic: query_weights.semantic,
                ast: 0.0,
                extra: HashMap::new(),
            },
            normalization: NormalizationStrategy::MinMax,
            min_score: 0.0,
            explain: false,
        };

        let chunks = &self.chunks;
        let ranked = rank(candidates, query, &rank_config, |id, query| {
            let content = chunks.get(id).map(|c| c.content.as_str()).unwrap_or("");
            let tf_idf_score = *sparse_map.get(id).unwrap_or(&0.0);
            let semantic_score = match dense_similarity.get(id) {
                Some(similarity) => *similarity,
                None => jaccard_overlap(query, content),
            };
            ScoreFactors {
                tf_idf_score,
                fuzzy_score: fuzzy_score(query, content),
                proximity_score: 0.0,
                semantic_score,
                ast_relevance: 0.0,
                extra: HashMap::new(),
            }
        });

        let results = ranked
            .into_iter()
            .take(options.top_k)
            .filter_map(|entry| {
                let chunk = self.chunks.get(&entry.item)?;
                Some(SearchResult {
                    id: entry.item.clone(),
                    score: entry.score,
                    similarity: options.include_similarity.then(|| dense_similarity.get(&entry.item).copied()).flatten(),
                    content: options.include_content.then(|| chunk.content.clone()),
                    metadata: options.include_metadata.then(|| chunk.metadata.clone()),
                })
            })
            .collect();

        let results: Vec<SearchResult> = results;
        self.result_cache.set(cache_key, results.clone(), results.len());
        Ok(results)
    }

    /// Gathers `Exact`/`Nearby`/`Parent` snippets around `position` within
    /// `content` (spec §4.5, component C6), using and refreshing the
    /// gatherer's own `(languageId, line, column)` cache.
    pub fn gather_context(
        &mut self,
        content: &str,
        language_id: &str,
        position: Position,
        options: &GatherOptions,
        token: Option<&CancellationToken>,
    ) -> Vec<CodeSnippet> {
        let model = StringModel::new(content, language_id);
        self.gatherer.get_all_context_snippets(&model, position, options, token)
    }

    /// Drops every cached gather result (spec §4.5's `clearCache`).
    pub fn clear_gather_cache(&mut self) {
        self.gatherer.clear_cache();
    }

    /// Searches, then assembles a deterministic system/user message pair
    /// within `capabilities`'s token budget (spec §4.8).
    pub async fn build_prompt(
        &mut self,
        query: &str,
        options: &SearchOptions,
        capabilities: &ModelCapabilities,
        token: Option<&CancellationToken>,
    ) -> Result<PromptResult> {
        let results = self.search(query, options, token).await?;

        let snippets: Vec<PromptSnippet> = results
            .into_iter()
            .filter_map(|result| {
                let chunk = self.chunks.get(&result.id)?;
                Some(PromptSnippet {
                    file_name: chunk.metadata.file_name.clone().or_else(|| chunk.metadata.file_path.clone()),
                    language: chunk.metadata.language.clone(),
                    start_line: chunk.metadata.start_line,
                    end_line: chunk.metadata.end_line,
                    content: chunk.content.clone(),
                    relevance: result.score,
                })
            })
            .collect();

        Ok(assemble_prompt(query, snippets, capabilities, &WordCountEstimator))
    }
}

/// Deterministic cache key for a `search` call: two calls with the same
/// query and the same result-shaping options hit the same entry.
fn search_cache_key(query: &str, options: &SearchOptions) -> String {
    format!(
        "{query}\u{1}{}\u{1}{}\u{1}{}\u{1}{}\u{1}{}",
        options.top_k, options.threshold, options.include_similarity, options.include_content, options.include_metadata,
    )
}

fn types_matches(path: &str, options: &IndexOptions) -> Result<bool> {
    types::matches_patterns(path, &options.include_patterns, &options.exclude_patterns)
}

/// Substring/per-term containment ratio (spec §4.6): `1.0` on a full query
/// substring match, otherwise the fraction of query terms individually
/// present in `content`.
fn fuzzy_score(query: &str, content: &str) -> f32 {
    let content_lower = content.to_lowercase();
    let query_lower = query.to_lowercase();
    if query_lower.trim().is_empty() {
        return 0.0;
    }
    if content_lower.contains(query_lower.trim()) {
        return 1.0;
    }
    let terms: Vec<&str> = query_lower.split_whitespace().collect();
    if terms.is_empty() {
        return 0.0;
    }
    let matched = terms.iter().filter(|t| content_lower.contains(*t)).count();
    matched as f32 / terms.len() as f32
}

/// Token-Jaccard fallback for `semanticScore` when no embedding is
/// available for a candidate (spec §4.6).
fn jaccard_overlap(query: &str, content: &str) -> f32 {
    let query_terms: HashSet<String> = context_sparse_index::tokenize(query).into_iter().collect();
    let content_terms: HashSet<String> = context_sparse_index::tokenize(content).into_iter().collect();
    if query_terms.is_empty() || content_terms.is_empty() {
        return 0.0;
    }
    let intersection = query_terms.intersection(&content_terms).count();
    let union = query_terms.union(&content_terms).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}
