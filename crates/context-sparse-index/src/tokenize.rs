use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\p{L}[\p{L}\d]{2,}\b").unwrap());

/// Tokenizer shared by indexing and querying (spec §4.2): words of at least
/// three letters, lowercased, no stemming or stop-word removal at this
/// layer. Each matched word also contributes its camelCase-split parts (when
/// a part has three or more letters) as additional terms, so `computeEmbeddings`
/// indexes both the whole identifier and `compute`/`embeddings`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in WORD.find_iter(text).map(|m| m.as_str()) {
        let lower = word.to_lowercase();
        tokens.push(lower.clone());
        for part in split_camel_case(word) {
            if part.chars().filter(|c| c.is_alphabetic()).count() >= 3 {
                let part_lower = part.to_lowercase();
                if part_lower != lower {
                    tokens.push(part_lower);
                }
            }
        }
    }
    tokens
}

fn split_camel_case(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            if prev.is_lowercase() || prev.is_numeric() {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_drops_short_words() {
        let tokens = tokenize("A Document about Cats");
        assert!(tokens.contains(&"document".to_string()));
        assert!(tokens.contains(&"cats".to_string()));
        assert!(!tokens.contains(&"a".to_string()));
    }

    #[test]
    fn splits_camel_case_identifiers() {
        let tokens = tokenize("computeEmbeddings");
        assert!(tokens.contains(&"computeembeddings".to_string()));
        assert!(tokens.contains(&"compute".to_string()));
        assert!(tokens.contains(&"embeddings".to_string()));
    }

    #[test]
    fn short_camel_parts_are_not_added_separately() {
        let tokens = tokenize("getId");
        assert!(tokens.contains(&"getid".to_string()));
        assert!(!tokens.contains(&"id".to_string()));
    }
}
