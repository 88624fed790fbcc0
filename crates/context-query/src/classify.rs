const QUESTION_WORDS: &[&str] = &["what", "why", "how", "when", "where", "who", "which", "что", "почему", "как", "когда", "где"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Identifier,
    Path,
    Conceptual,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryWeights {
    pub semantic: f32,
    pub fuzzy: f32,
    pub candidate_multiplier: u32,
}

fn is_path_token(token: &str) -> bool {
    token.contains('/') || token.contains('\\') || token.contains("::") || token.rsplit_once('.').is_some_and(|(_, ext)| !ext.is_empty() && ext.len() <= 5)
}

fn is_question_leader(token: &str) -> bool {
    QUESTION_WORDS.contains(&token.to_lowercase().as_str())
}

fn is_identifier_like(token: &str) -> bool {
    token.contains('_') || token.chars().any(|c| c.is_ascii_digit()) || (token.chars().any(char::is_uppercase) && token.chars().any(char::is_lowercase))
}

/// Classifies an intent for a query (spec §4.7's matcher factory). A single
/// path-like token is `Path`; a mixed query led by an identifier-like,
/// non-path, non-question token is `Identifier`; otherwise identifier-like
/// tokens fall back to `Identifier` and everything else is `Conceptual`.
pub fn classify(query: &str) -> QueryType {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return QueryType::Conceptual;
    }

    if tokens.len() == 1 && is_path_token(tokens[0]) {
        return QueryType::Path;
    }

    let leader = tokens[0];
    if !is_question_leader(leader) && !is_path_token(leader) && is_identifier_like(leader) {
        return QueryType::Identifier;
    }

    if tokens.iter().any(|t| is_identifier_like(t)) && !is_question_leader(leader) {
        return QueryType::Identifier;
    }

    QueryType::Conceptual
}

pub fn weights(query: &str) -> QueryWeights {
    match classify(query) {
        QueryType::Identifier => QueryWeights { semantic: 0.1, fuzzy: 0.9, candidate_multiplier: 3 },
        QueryType::Path => QueryWeights { semantic: 0.15, fuzzy: 0.85, candidate_multiplier: 4 },
        QueryType::Conceptual => {
            if query.split_whitespace().count() >= 4 {
                QueryWeights { semantic: 0.9, fuzzy: 0.1, candidate_multiplier: 6 }
            } else {
                QueryWeights { semantic: 0.8, fuzzy: 0.2, candidate_multiplier: 6 }
            }
        }
    }
}
