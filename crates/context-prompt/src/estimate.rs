/// Pluggable token-cost estimator (open question (c)): the default is a
/// deliberately rough `ceil(word_count * 1.3)` approximation, acceptable
/// for v1 since exact BPE tokenization is explicitly a non-goal. Swap in a
/// model-specific estimator by implementing this trait.
pub trait EstimateTokens {
    fn estimate(&self, text: &str) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WordCountEstimator;

impl EstimateTokens for WordCountEstimator {
    fn estimate(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        ((words as f64) * 1.3).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_ceil_of_word_count_times_1_3() {
        let estimator = WordCountEstimator;
        assert_eq!(estimator.estimate("one two three"), 4);
    }

    #[test]
    fn empty_text_estimates_zero() {
        assert_eq!(WordCountEstimator.estimate(""), 0);
    }
}
