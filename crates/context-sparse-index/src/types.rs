use serde::{Deserialize, Serialize};

/// A single chunk's relevance score against a query (spec §3, §4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfScore {
    pub chunk_id: String,
    pub score: f64,
}

/// Sort descending and scale by the maximum so the top score is exactly
/// `1.0` (spec §8: normalized scores in `[0, 1]`, sorted descending, max is
/// `1` whenever any positive score exists).
pub fn normalize(mut scores: Vec<TfIdfScore>) -> Vec<TfIdfScore> {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    if let Some(max) = scores.first().map(|s| s.score) {
        if max > 0.0 {
            for entry in &mut scores {
                entry.score /= max;
            }
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_scales_by_max_and_sorts_descending() {
        let scores = vec![
            TfIdfScore { chunk_id: "a".into(), score: 2.0 },
            TfIdfScore { chunk_id: "b".into(), score: 4.0 },
            TfIdfScore { chunk_id: "c".into(), score: 1.0 },
        ];
        let normalized = normalize(scores);
        assert_eq!(normalized[0].chunk_id, "b");
        assert_eq!(normalized[0].score, 1.0);
        assert!(normalized.iter().all(|s| s.score >= 0.0 && s.score <= 1.0));
    }

    #[test]
    fn normalize_of_empty_is_empty() {
        assert!(normalize(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn proptest_normalize_stays_in_unit_range_and_preserves_len(
            raw_scores in prop::collection::vec(0.0f64..1000.0, 0..20)
        ) {
            let scores: Vec<TfIdfScore> = raw_scores
                .into_iter()
                .enumerate()
                .map(|(i, score)| TfIdfScore { chunk_id: format!("c{i}"), score })
                .collect();
            let original_len = scores.len();

            let normalized = normalize(scores);

            prop_assert_eq!(normalized.len(), original_len);
            for entry in &normalized {
                prop_assert!(entry.score >= 0.0 && entry.score <= 1.0);
            }
            for pair in normalized.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }

        #[test]
        fn proptest_top_score_is_exactly_one_when_any_positive(
            raw_scores in prop::collection::vec(0.01f64..1000.0, 1..20)
        ) {
            let scores: Vec<TfIdfScore> = raw_scores
                .into_iter()
                .enumerate()
                .map(|(i, score)| TfIdfScore { chunk_id: format!("c{i}"), score })
                .collect();

            let normalized = normalize(scores);

            prop_assert_eq!(normalized[0].score, 1.0);
        }
    }
}
