use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSnippet {
    pub file_name: Option<String>,
    pub language: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub content: String,
    pub relevance: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelCapabilities {
    pub context_window: usize,
    pub supports_system_message: bool,
    pub max_output_tokens: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMetadata {
    pub included_snippets: usize,
    pub total_snippets: usize,
    pub estimated_tokens: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResult {
    pub system_message: Option<String>,
    pub user_message: String,
    pub metadata: PromptMetadata,
}
