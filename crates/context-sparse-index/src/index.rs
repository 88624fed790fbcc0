use crate::tokenize::tokenize;
use crate::types::TfIdfScore;
use context_cancel::{is_cancelled, CancellationToken};
use std::collections::HashMap;

/// TF-IDF sparse index (spec §4.2, component C3). Indexes individual chunks,
/// not whole documents — a document's score for a query is the max over its
/// chunks' scores, computed by the caller (or via [`SparseIndex::document_scores`]).
#[derive(Debug, Default)]
pub struct SparseIndex {
    chunk_count: usize,
    /// term -> number of chunks containing that term at least once.
    document_frequency: HashMap<String, usize>,
    /// chunk id -> term frequency within that chunk.
    chunk_terms: HashMap<String, HashMap<String, usize>>,
    /// document key -> ordered chunk ids currently indexed for it.
    documents: HashMap<String, Vec<String>>,
    /// chunk id -> owning document key, for document-level aggregation.
    chunk_owner: HashMap<String, String>,
}

impl SparseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Replaces all chunks previously indexed under `key` with `chunks`
    /// (`(chunk_id, content)` pairs, in order). Existing entries for `key`
    /// are deleted first, so re-indexing identical content is idempotent.
    pub fn update_documents(&mut self, key: &str, chunks: &[(String, String)]) {
        self.delete_document(key);

        let mut chunk_ids = Vec::with_capacity(chunks.len());
        for (chunk_id, content) in chunks {
            let mut frequency: HashMap<String, usize> = HashMap::new();
            for term in tokenize(content) {
                *frequency.entry(term).or_insert(0) += 1;
            }
            for term in frequency.keys() {
                *self.document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            self.chunk_terms.insert(chunk_id.clone(), frequency);
            self.chunk_owner.insert(chunk_id.clone(), key.to_string());
            self.chunk_count += 1;
            chunk_ids.push(chunk_id.clone());
        }
        self.documents.insert(key.to_string(), chunk_ids);
    }

    /// Reverses `update_documents` for `key` exactly: every term's occurrence
    /// counter is decremented once per chunk that contained it, and removed
    /// entirely once it reaches zero. No-op for an unknown key.
    pub fn delete_document(&mut self, key: &str) {
        let Some(chunk_ids) = self.documents.remove(key) else { return };

        for chunk_id in chunk_ids {
            let Some(frequency) = self.chunk_terms.remove(&chunk_id) else { continue };
            for term in frequency.keys() {
                if let Some(count) = self.document_frequency.get_mut(term) {
                    *count -= 1;
                    if *count == 0 {
                        self.document_frequency.remove(term);
                    }
                }
            }
            self.chunk_owner.remove(&chunk_id);
            self.chunk_count -= 1;
        }
    }

    fn idf(&self, term: &str) -> f64 {
        match self.document_frequency.get(term) {
            Some(&occurrences) if occurrences > 0 => {
                ((self.chunk_count as f64 + 1.0) / occurrences as f64).ln()
            }
            _ => 0.0,
        }
    }

    /// Unsorted chunk scores with `score > 0`, checked for cancellation
    /// once per chunk; a cancellation mid-scan discards any partial results
    /// and returns `[]`, matching §4.2's "absent terms contribute nothing"
    /// sparsity guarantee together with the cancellation contract in §5.
    pub fn search(&self, query: &str, token: Option<&CancellationToken>) -> Vec<TfIdfScore> {
        let mut query_tf: HashMap<String, usize> = HashMap::new();
        for term in tokenize(query) {
            *query_tf.entry(term).or_insert(0) += 1;
        }

        let mut idf_cache: HashMap<String, f64> = HashMap::new();
        let mut query_weight: HashMap<String, f64> = HashMap::new();
        for (term, tf) in &query_tf {
            let idf = *idf_cache.entry(term.clone()).or_insert_with(|| self.idf(term));
            if idf > 0.0 {
                query_weight.insert(term.clone(), *tf as f64 * idf);
            }
        }

        if query_weight.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();
        for (chunk_id, frequency) in &self.chunk_terms {
            if is_cancelled(token) {
                return Vec::new();
            }

            let mut score = 0.0;
            for (term, weight) in &query_weight {
                if let Some(&tf_c) = frequency.get(term) {
                    score += tf_c as f64 * idf_cache[term] * weight;
                }
            }
            if score > 0.0 {
                results.push(TfIdfScore { chunk_id: chunk_id.clone(), score });
            }
        }
        results
    }

    /// Per-document score: the max over the scores of its own chunks.
    /// Documents with no scoring chunk are absent, not zero.
    pub fn document_scores(&self, query: &str, token: Option<&CancellationToken>) -> Vec<(String, f64)> {
        let chunk_scores = self.search(query, token);
        let mut by_document: HashMap<String, f64> = HashMap::new();
        for score in chunk_scores {
            let Some(owner) = self.chunk_owner.get(&score.chunk_id) else { continue };
            let entry = by_document.entry(owner.clone()).or_insert(0.0);
            if score.score > *entry {
                *entry = score.score;
            }
        }
        by_document.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> SparseIndex {
        let mut index = SparseIndex::new();
        index.update_documents(
            "doc1",
            &[("doc1#0".into(), "This is a document about cats and dogs".into())],
        );
        index.update_documents(
            "doc2",
            &[("doc2#0".into(), "Another document about programming languages".into())],
        );
        index.update_documents(
            "doc3",
            &[(
                "doc3#0".into(),
                "A document talking about machine learning and artificial intelligence".into(),
            )],
        );
        index
    }

    /// spec §8 scenario 1.
    #[test]
    fn machine_learning_query_favors_doc3_only() {
        let index = corpus();
        let scores = index.document_scores("machine learning", None);
        let by_key: HashMap<String, f64> = scores.into_iter().collect();

        let doc3_score = *by_key.get("doc3").expect("doc3 must score");
        assert!(doc3_score > 0.0);
        assert!(!by_key.contains_key("doc1"));
        assert!(!by_key.contains_key("doc2"));

        for (key, score) in &by_key {
            if key != "doc3" {
                assert!(*score <= doc3_score);
            }
        }
    }

    /// spec §8 scenario 2.
    #[test]
    fn document_query_normalizes_into_zero_one_with_max_one() {
        let index = corpus();
        let scores = index.document_scores("document", None);
        let tf_idf_scores: Vec<TfIdfScore> =
            scores.into_iter().map(|(chunk_id, score)| TfIdfScore { chunk_id, score }).collect();
        let normalized = crate::types::normalize(tf_idf_scores);

        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0].score, 1.0);
        assert!(normalized.iter().all(|s| s.score >= 0.0 && s.score <= 1.0));
    }

    #[test]
    fn update_then_delete_removes_all_terms() {
        let mut index = SparseIndex::new();
        index.update_documents("k", &[("k#0".into(), "hello world hello".into())]);
        assert_eq!(index.chunk_count(), 1);

        index.delete_document("k");
        assert_eq!(index.chunk_count(), 0);
        assert!(index.search("hello", None).is_empty());
    }

    #[test]
    fn reindexing_identical_key_is_idempotent() {
        let mut index = SparseIndex::new();
        index.update_documents("k", &[("k#0".into(), "alpha beta gamma".into())]);
        let first = index.chunk_count();
        index.update_documents("k", &[("k#0".into(), "alpha beta gamma".into())]);
        assert_eq!(index.chunk_count(), first);
    }

    #[test]
    fn absent_term_scores_nothing() {
        let index = corpus();
        assert!(index.search("zzzznotpresent", None).is_empty());
    }

    #[test]
    fn empty_corpus_returns_empty() {
        let index = SparseIndex::new();
        assert!(index.search("anything", None).is_empty());
    }

    #[test]
    fn cancellation_returns_empty() {
        let index = corpus();
        let source = context_cancel::CancellationTokenSource::new();
        source.cancel();
        let token = source.token();
        assert!(index.search("document", Some(&token)).is_empty());
    }
}
