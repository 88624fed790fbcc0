use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parsed query (spec §4.7): exact phrases, free terms (stop words already
/// removed), exclusions (leading `-`), and `field:value` filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub phrases: Vec<String>,
    pub terms: Vec<String>,
    pub exclusions: Vec<String>,
    pub filters: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Fuzzy,
    Semantic,
    None,
}
