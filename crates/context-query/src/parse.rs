use crate::types::ParsedQuery;
use std::collections::HashMap;

const STOP_WORDS: &[&str] =
    &["the", "a", "an", "is", "are", "was", "were", "in", "on", "at", "to", "for", "of", "and", "or", "but", "with", "this", "that"];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Parses a raw query string (spec §4.7): `"..."` phrases are kept exact,
/// leading `-` marks an exclusion, `field:value` tokens become filters, and
/// everything else is a free term with stop words removed.
pub fn parse_query(raw: &str) -> ParsedQuery {
    let mut phrases = Vec::new();
    let mut exclusions = Vec::new();
    let mut filters = HashMap::new();
    let mut terms = Vec::new();

    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }

        if chars[i] == '"' {
            let mut j = i + 1;
            while j < chars.len() && chars[j] != '"' {
                j += 1;
            }
            let phrase: String = chars[i + 1..j].iter().collect();
            if !phrase.is_empty() {
                phrases.push(phrase);
            }
            i = if j < chars.len() { j + 1 } else { chars.len() };
            continue;
        }

        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '"' {
            i += 1;
        }
        let token: String = chars[start..i].iter().collect();

        if let Some(stripped) = token.strip_prefix('-') {
            if !stripped.is_empty() {
                exclusions.push(stripped.to_lowercase());
            }
            continue;
        }

        if let Some(idx) = token.find(':') {
            let field = &token[..idx];
            let value = &token[idx + 1..];
            if !field.is_empty() && !value.is_empty() {
                filters.insert(field.to_lowercase(), value.to_string());
                continue;
            }
        }

        let lower = token.to_lowercase();
        if !lower.is_empty() && !is_stop_word(&lower) {
            terms.push(lower);
        }
    }

    ParsedQuery { phrases, terms, exclusions, filters }
}

/// Canonical textual form of a parsed query: phrases, then filters
/// (lexicographic by field, since `HashMap` iteration order is not stable),
/// then exclusions, then free terms.
pub fn serialize_query(query: &ParsedQuery) -> String {
    let mut parts = Vec::new();
    for phrase in &query.phrases {
        parts.push(format!("\"{phrase}\""));
    }

    let mut fields: Vec<&String> = query.filters.keys().collect();
    fields.sort();
    for field in fields {
        parts.push(format!("{field}:{}", query.filters[field]));
    }

    for exclusion in &query.exclusions {
        parts.push(format!("-{exclusion}"));
    }
    for term in &query.terms {
        parts.push(term.clone());
    }

    parts.join(" ")
}
