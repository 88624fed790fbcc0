use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw per-factor scores for one candidate (spec §4.6). Every channel is
/// clamped to `[0, 1]` by the engine, never trusted from the scoring
/// closure as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreFactors {
    pub tf_idf_score: f32,
    pub fuzzy_score: f32,
    pub proximity_score: f32,
    pub semantic_score: f32,
    pub ast_relevance: f32,
    /// Additive extra factors (file-importance, recency, definition-proximity, ...),
    /// weighted the same way as the built-in five.
    pub extra: HashMap<String, f32>,
}

impl ScoreFactors {
    pub fn clamp(mut self) -> Self {
        self.tf_idf_score = self.tf_idf_score.clamp(0.0, 1.0);
        self.fuzzy_score = self.fuzzy_score.clamp(0.0, 1.0);
        self.proximity_score = self.proximity_score.clamp(0.0, 1.0);
        self.semantic_score = self.semantic_score.clamp(0.0, 1.0);
        self.ast_relevance = self.ast_relevance.clamp(0.0, 1.0);
        for value in self.extra.values_mut() {
            *value = value.clamp(0.0, 1.0);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorWeights {
    pub tf_idf: f32,
    pub fuzzy: f32,
    pub proximity: f32,
    pub semantic: f32,
    pub ast: f32,
    pub extra: HashMap<String, f32>,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self { tf_idf: 1.0, fuzzy: 1.0, proximity: 1.0, semantic: 1.0, ast: 1.0, extra: HashMap::new() }
    }
}

impl FactorWeights {
    /// Weighted sum of `factors`, using this set of weights normalized to
    /// sum to `1.0` (an all-zero weight set degrades to an even split).
    pub fn weighted_sum(&self, factors: &ScoreFactors) -> f32 {
        let mut pairs = vec![
            (self.tf_idf, factors.tf_idf_score),
            (self.fuzzy, factors.fuzzy_score),
            (self.proximity, factors.proximity_score),
            (self.semantic, factors.semantic_score),
            (self.ast, factors.ast_relevance),
        ];
        for (name, weight) in &self.extra {
            pairs.push((*weight, *factors.extra.get(name).unwrap_or(&0.0)));
        }

        let total_weight: f32 = pairs.iter().map(|(w, _)| w).sum();
        if total_weight <= 0.0 {
            let n = pairs.len().max(1) as f32;
            return pairs.iter().map(|(_, v)| v / n).sum();
        }
        pairs.iter().map(|(w, v)| (w / total_weight) * v).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizationStrategy {
    MinMax,
    Softmax,
    None,
}

impl Default for NormalizationStrategy {
    fn default() -> Self {
        NormalizationStrategy::MinMax
    }
}

#[derive(Debug, Clone)]
pub struct RankConfig {
    pub weights: FactorWeights,
    pub normalization: NormalizationStrategy,
    pub min_score: f32,
    pub explain: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self { weights: FactorWeights::default(), normalization: NormalizationStrategy::default(), min_score: 0.0, explain: false }
    }
}

#[derive(Debug, Clone)]
pub struct RankedItem<T> {
    pub item: T,
    pub score: f32,
    pub factors: ScoreFactors,
    pub explanation: Option<String>,
}
