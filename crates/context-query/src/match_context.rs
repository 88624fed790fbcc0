use crate::expand::expand_query;
use crate::types::{MatchType, ParsedQuery};

const FUZZY_THRESHOLD: f32 = 0.6;

/// Classifies how `query` matches `candidate` (spec §4.7): exact phrases
/// first, then free terms, then synonym expansions, then Levenshtein
/// fuzziness above [`FUZZY_THRESHOLD`], in that priority order.
pub fn match_context(query: &ParsedQuery, candidate: &str) -> MatchType {
    let lower_candidate = candidate.to_lowercase();

    if !query.phrases.is_empty() && query.phrases.iter().any(|p| lower_candidate.contains(&p.to_lowercase())) {
        return MatchType::Exact;
    }

    if !query.terms.is_empty() && query.terms.iter().any(|t| lower_candidate.contains(t.as_str())) {
        return MatchType::Exact;
    }

    let expanded = expand_query(&query.terms);
    if expanded.iter().any(|t| lower_candidate.contains(t.as_str())) {
        return MatchType::Semantic;
    }

    let best_similarity = query
        .terms
        .iter()
        .flat_map(|term| lower_candidate.split_whitespace().map(move |word| similarity(term, word)))
        .fold(0.0f32, f32::max);

    if best_similarity > FUZZY_THRESHOLD {
        return MatchType::Fuzzy;
    }

    MatchType::None
}

fn similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (levenshtein(a, b) as f32 / max_len as f32)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let temp = row[j + 1];
            row[j + 1] = if ca == cb {
                prev_diag
            } else {
                1 + prev_diag.min(row[j]).min(row[j + 1])
            };
            prev_diag = temp;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_query;

    #[test]
    fn exact_phrase_wins_over_everything() {
        let parsed = parse_query(r#""quick brown""#);
        assert_eq!(match_context(&parsed, "the quick brown fox"), MatchType::Exact);
    }

    #[test]
    fn free_term_present_is_exact() {
        let parsed = parse_query("cache");
        assert_eq!(match_context(&parsed, "the cache layer evicts entries"), MatchType::Exact);
    }

    #[test]
    fn synonym_expansion_is_semantic() {
        let parsed = parse_query("search");
        assert_eq!(match_context(&parsed, "a function to find records"), MatchType::Semantic);
    }

    #[test]
    fn close_typo_is_fuzzy() {
        let parsed = parse_query("embeddingz");
        assert_eq!(match_context(&parsed, "compute an embedding vector"), MatchType::Fuzzy);
    }

    #[test]
    fn unrelated_text_is_none() {
        let parsed = parse_query("xyzxyz");
        assert_eq!(match_context(&parsed, "totally unrelated sentence here"), MatchType::None);
    }

    #[test]
    fn levenshtein_of_identical_strings_is_zero() {
        assert_eq!(levenshtein("same", "same"), 0);
    }
}
