use crate::estimate::EstimateTokens;
use crate::types::{ModelCapabilities, PromptMetadata, PromptResult, PromptSnippet};

/// Tokens reserved for the surrounding prompt scaffolding (instructions,
/// role markers) before any snippet budget is computed.
const RESERVED_TOKENS: usize = 500;

/// Prompt assembly (spec §4.8, component C10). Deterministic: same inputs
/// always produce the same trimmed set and the same formatted text.
pub fn build_prompt(
    query: &str,
    mut snippets: Vec<PromptSnippet>,
    capabilities: &ModelCapabilities,
    estimator: &dyn EstimateTokens,
) -> PromptResult {
    let total_snippets = snippets.len();
    snippets.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap_or(std::cmp::Ordering::Equal));

    let reserved = RESERVED_TOKENS + capabilities.max_output_tokens.unwrap_or(0);
    let budget = capabilities.context_window.saturating_sub(reserved);

    let mut included = Vec::new();
    let mut estimated_tokens = 0usize;
    for snippet in snippets {
        let cost = estimator.estimate(&snippet.content);
        if estimated_tokens + cost > budget {
            break;
        }
        estimated_tokens += cost;
        included.push(snippet);
    }

    let context_block = included.iter().map(format_snippet).collect::<Vec<_>>().join("\n\n");

    let (system_message, user_message) = if capabilities.supports_system_message {
        (Some(context_block), query.to_string())
    } else if context_block.is_empty() {
        (None, query.to_string())
    } else {
        (None, format!("{context_block}\n\n{query}"))
    };

    PromptResult {
        system_message,
        user_message,
        metadata: PromptMetadata { included_snippets: included.len(), total_snippets, estimated_tokens },
    }
}

fn format_snippet(snippet: &PromptSnippet) -> String {
    let file_name = snippet.file_name.as_deref().unwrap_or("unknown");
    let language = snippet.language.as_deref().unwrap_or("");
    format!(
        "File: {file_name} (Lines {}-{})\n```{language}\n{}\n```",
        snippet.start_line, snippet.end_line, snippet.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::WordCountEstimator;

    fn snippet(relevance: f32, content: &str) -> PromptSnippet {
        PromptSnippet {
            file_name: Some("a.rs".to_string()),
            language: Some("rust".to_string()),
            start_line: 1,
            end_line: 2,
            content: content.to_string(),
            relevance,
        }
    }

    /// spec §8 scenario 6.
    #[test]
    fn trims_to_exactly_one_snippet_under_a_tight_budget() {
        let content = "word ".repeat(150);
        let snippets: Vec<PromptSnippet> = (0..10).map(|_| snippet(1.0, content.trim())).collect();
        let capabilities =
            ModelCapabilities { context_window: 1000, supports_system_message: true, max_output_tokens: Some(200) };

        let result = build_prompt("find the thing", snippets, &capabilities, &WordCountEstimator);

        assert_eq!(result.metadata.total_snippets, 10);
        assert_eq!(result.metadata.included_snippets, 1);
    }

    #[test]
    fn snippet_alone_exceeding_budget_yields_zero_included() {
        let huge = "word ".repeat(10_000);
        let snippets = vec![snippet(1.0, huge.trim())];
        let capabilities =
            ModelCapabilities { context_window: 600, supports_system_message: true, max_output_tokens: Some(0) };

        let result = build_prompt("q", snippets, &capabilities, &WordCountEstimator);
        assert_eq!(result.metadata.included_snippets, 0);
    }

    #[test]
    fn sorts_by_relevance_before_trimming() {
        let snippets = vec![snippet(0.2, "low"), snippet(0.9, "high")];
        let capabilities =
            ModelCapabilities { context_window: 100_000, supports_system_message: true, max_output_tokens: Some(0) };
        let result = build_prompt("q", snippets, &capabilities, &WordCountEstimator);
        assert!(result.system_message.as_ref().unwrap().find("high").unwrap()
            < result.system_message.as_ref().unwrap().find("low").unwrap());
    }

    #[test]
    fn system_text_is_prepended_when_model_lacks_system_role() {
        let snippets = vec![snippet(1.0, "content here")];
        let capabilities =
            ModelCapabilities { context_window: 100_000, supports_system_message: false, max_output_tokens: Some(0) };
        let result = build_prompt("the query", snippets, &capabilities, &WordCountEstimator);
        assert!(result.system_message.is_none());
        assert!(result.user_message.contains("content here"));
        assert!(result.user_message.ends_with("the query"));
    }

    #[test]
    fn deterministic_across_repeated_calls() {
        let snippets = vec![snippet(0.5, "alpha"), snippet(0.5, "beta")];
        let capabilities =
            ModelCapabilities { context_window: 100_000, supports_system_message: true, max_output_tokens: Some(0) };
        let a = build_prompt("q", snippets.clone(), &capabilities, &WordCountEstimator);
        let b = build_prompt("q", snippets, &capabilities, &WordCountEstimator);
        assert_eq!(a.user_message, b.user_message);
        assert_eq!(a.system_message, b.system_message);
    }
}
