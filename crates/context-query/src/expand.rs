use once_cell::sync::Lazy;
use std::collections::HashMap;

const MAX_EXPANDED_TERMS: usize = 15;

static SYNONYMS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("error", &["exception", "fault", "failure"][..]),
        ("handle", &["process", "manage", "deal"][..]),
        ("vector", &["embedding", "array"][..]),
        ("similarity", &["distance", "closeness"][..]),
        ("embedding", &["vector", "representation"][..]),
        ("search", &["find", "query", "lookup"][..]),
        ("index", &["catalog", "registry"][..]),
        ("function", &["method", "procedure", "routine"][..]),
        ("class", &["type", "struct"][..]),
        ("method", &["function", "procedure"][..]),
        ("parse", &["analyze", "interpret"][..]),
        ("ast", &["syntax tree", "parse tree"][..]),
        ("chunk", &["segment", "fragment", "piece"][..]),
        ("fuzzy", &["approximate", "partial"][..]),
    ])
});

/// Naive English stemmer: strips `ing`, `ed`, or a trailing `s` that isn't
/// part of a double `s`. Deliberately crude — it exists to widen recall for
/// the synonym lookup, not to model morphology precisely.
fn stem(word: &str) -> String {
    if let Some(stripped) = word.strip_suffix("ing") {
        if stripped.len() >= 3 {
            return stripped.to_string();
        }
    }
    if let Some(stripped) = word.strip_suffix("ed") {
        if stripped.len() >= 3 {
            return stripped.to_string();
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") && word.len() > 3 {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Query expansion (spec §4.7): adds built-in synonyms for each term (after
/// stemming), truncated to [`MAX_EXPANDED_TERMS`].
pub fn expand_query(terms: &[String]) -> Vec<String> {
    let mut expanded = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for term in terms {
        if seen.insert(term.clone()) {
            expanded.push(term.clone());
        }
        let stemmed = stem(term);
        if let Some(synonyms) = SYNONYMS.get(stemmed.as_str()) {
            for synonym in *synonyms {
                if seen.insert(synonym.to_string()) {
                    expanded.push(synonym.to_string());
                }
            }
        }
        if expanded.len() >= MAX_EXPANDED_TERMS {
            break;
        }
    }

    expanded.truncate(MAX_EXPANDED_TERMS);
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_known_synonyms() {
        let expanded = expand_query(&["search".to_string()]);
        assert!(expanded.contains(&"search".to_string()));
        assert!(expanded.contains(&"find".to_string()));
    }

    #[test]
    fn stems_before_matching_synonyms() {
        let expanded = expand_query(&["searching".to_string()]);
        assert!(expanded.contains(&"find".to_string()));
    }

    #[test]
    fn unknown_term_expands_to_itself_only() {
        let expanded = expand_query(&["zzzqqq".to_string()]);
        assert_eq!(expanded, vec!["zzzqqq".to_string()]);
    }

    #[test]
    fn expansion_is_capped() {
        let terms: Vec<String> =
            ["error", "handle", "vector", "similarity", "embedding", "search"].iter().map(|s| s.to_string()).collect();
        let expanded = expand_query(&terms);
        assert!(expanded.len() <= MAX_EXPANDED_TERMS);
    }

    #[test]
    fn stemmer_handles_plurals_without_mangling_double_s() {
        assert_eq!(stem("classes"), "classe");
        assert_eq!(stem("class"), "class");
        assert_eq!(stem("functions"), "function");
    }
}
