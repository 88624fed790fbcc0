use crate::types::{NormalizationStrategy, RankConfig, RankedItem, ScoreFactors};

/// Multi-factor ranking (spec §4.6, component C8): scores every item with
/// `score_fn`, combines factors through `config.weights`, normalizes across
/// the whole candidate set, drops anything below `config.min_score`, and
/// returns a stable descending sort.
pub fn rank<T>(
    items: Vec<T>,
    query: &str,
    config: &RankConfig,
    score_fn: impl Fn(&T, &str) -> ScoreFactors,
) -> Vec<RankedItem<T>> {
    let mut scored: Vec<RankedItem<T>> = items
        .into_iter()
        .map(|item| {
            let factors = score_fn(&item, query).clamp();
            let raw_score = config.weights.weighted_sum(&factors);
            RankedItem { item, score: raw_score, factors, explanation: None }
        })
        .collect();

    normalize_in_place(&mut scored, config.normalization);

    if config.explain {
        for entry in &mut scored {
            entry.explanation = Some(explain(&entry.factors, &config.weights, entry.score));
        }
    }

    scored.retain(|entry| entry.score >= config.min_score);
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

fn normalize_in_place<T>(scored: &mut [RankedItem<T>], strategy: NormalizationStrategy) {
    match strategy {
        NormalizationStrategy::None => {}
        NormalizationStrategy::MinMax => {
            if scored.is_empty() {
                return;
            }
            let min = scored.iter().map(|e| e.score).fold(f32::INFINITY, f32::min);
            let max = scored.iter().map(|e| e.score).fold(f32::NEG_INFINITY, f32::max);
            if (max - min).abs() < f32::EPSILON {
                for entry in scored.iter_mut() {
                    entry.score = 1.0;
                }
            } else {
                for entry in scored.iter_mut() {
                    entry.score = (entry.score - min) / (max - min);
                }
            }
        }
        NormalizationStrategy::Softmax => {
            let exps: Vec<f32> = scored.iter().map(|e| e.score.exp()).collect();
            let sum: f32 = exps.iter().sum();
            if sum > 0.0 {
                for (entry, exp_value) in scored.iter_mut().zip(exps) {
                    entry.score = exp_value / sum;
                }
            }
        }
    }
}

fn explain(factors: &ScoreFactors, weights: &crate::types::FactorWeights, final_score: f32) -> String {
    format!(
        "tfidf={:.2}*{:.2} fuzzy={:.2}*{:.2} proximity={:.2}*{:.2} semantic={:.2}*{:.2} ast={:.2}*{:.2} -> {:.3}",
        factors.tf_idf_score,
        weights.tf_idf,
        factors.fuzzy_score,
        weights.fuzzy,
        factors.proximity_score,
        weights.proximity,
        factors.semantic_score,
        weights.semantic,
        factors.ast_relevance,
        weights.ast,
        final_score,
    )
}
