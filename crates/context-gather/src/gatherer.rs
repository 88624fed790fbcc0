use crate::model::TextModel;
use crate::snippet::{CodeSnippet, SnippetType};
use context_cancel::{is_cancelled, CancellationToken};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct GatherOptions {
    pub lines_above: usize,
    pub lines_below: usize,
    pub max_snippets: usize,
    pub min_relevance: f32,
}

impl Default for GatherOptions {
    fn default() -> Self {
        Self { lines_above: 5, lines_below: 5, max_snippets: 20, min_relevance: 0.2 }
    }
}

/// Local-context gatherer (spec §4.5, component C6). Produces `Exact`,
/// `Nearby`, and `Parent` snippets around a cursor position and caches the
/// merged result keyed by `(languageId, line, column)`.
#[derive(Default)]
pub struct LocalContextGatherer {
    cache: HashMap<(String, usize, usize), Vec<CodeSnippet>>,
}

impl LocalContextGatherer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached_snippets(&self, language_id: &str, position: Position) -> Option<&[CodeSnippet]> {
        self.cache.get(&(language_id.to_string(), position.line, position.column)).map(Vec::as_slice)
    }

    fn exact(&self, model: &dyn TextModel, position: Position) -> Option<CodeSnippet> {
        let line = model.get_line_content(position.line)?;
        Some(CodeSnippet {
            content: line.to_string(),
            start_line: position.line,
            end_line: position.line,
            relevance: 1.0,
            snippet_type: SnippetType::Exact,
        })
    }

    fn nearby(&self, model: &dyn TextModel, position: Position, options: &GatherOptions) -> Vec<CodeSnippet> {
        let mut snippets = Vec::new();

        if position.line > 1 {
            let from = position.line.saturating_sub(options.lines_above).max(1);
            let to = position.line - 1;
            if from <= to {
                if let Some(content) = join_lines(model, from, to) {
                    snippets.push(CodeSnippet {
                        content,
                        start_line: from,
                        end_line: to,
                        relevance: 0.8,
                        snippet_type: SnippetType::Nearby,
                    });
                }
            }
        }

        let from = position.line + 1;
        let to = (position.line + options.lines_below).min(model.get_line_count());
        if from <= to {
            if let Some(content) = join_lines(model, from, to) {
                snippets.push(CodeSnippet {
                    content,
                    start_line: from,
                    end_line: to,
                    relevance: 0.7,
                    snippet_type: SnippetType::Nearby,
                });
            }
        }

        snippets
    }

    /// Scans upward from `position.line - 1` for the first non-blank line
    /// with strictly smaller indentation than `position.line`'s own line.
    fn parent(&self, model: &dyn TextModel, position: Position) -> Option<CodeSnippet> {
        let current_line = model.get_line_content(position.line)?;
        let current_indent = indentation(current_line);

        let mut scan = position.line.checked_sub(1)?;
        while scan >= 1 {
            if let Some(line) = model.get_line_content(scan) {
                if !line.trim().is_empty() && indentation(line) < current_indent {
                    let content = join_lines(model, scan, position.line)?;
                    return Some(CodeSnippet {
                        content,
                        start_line: scan,
                        end_line: position.line,
                        relevance: 0.9,
                        snippet_type: SnippetType::Parent,
                    });
                }
            }
            if scan == 1 {
                break;
            }
            scan -= 1;
        }
        None
    }

    /// Gathers and merges every sub-strategy for `position`, sorted by
    /// descending relevance, filtered to `min_relevance`, truncated to
    /// `max_snippets`. Cancellation is checked before each sub-gather; a
    /// token cancelled partway returns whatever was already gathered.
    pub fn get_all_context_snippets(
        &mut self,
        model: &dyn TextModel,
        position: Position,
        options: &GatherOptions,
        token: Option<&CancellationToken>,
    ) -> Vec<CodeSnippet> {
        let mut snippets = Vec::new();

        if !is_cancelled(token) {
            if let Some(snippet) = self.exact(model, position) {
                snippets.push(snippet);
            }
        }
        if !is_cancelled(token) {
            snippets.extend(self.nearby(model, position, options));
        }
        if !is_cancelled(token) {
            if let Some(snippet) = self.parent(model, position) {
                snippets.push(snippet);
            }
        }

        snippets.retain(|s| s.relevance >= options.min_relevance);
        snippets.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap_or(std::cmp::Ordering::Equal));
        snippets.truncate(options.max_snippets);

        self.cache.insert((model.get_language_id().to_string(), position.line, position.column), snippets.clone());
        snippets
    }
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn join_lines(model: &dyn TextModel, from: usize, to: usize) -> Option<String> {
    let mut lines = Vec::new();
    for line in from..=to {
        lines.push(model.get_line_content(line)?.to_string());
    }
    let joined = lines.join("\n");
    let trimmed = joined.trim_end().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StringModel;

    fn sample() -> StringModel {
        StringModel::new(
            "fn outer() {\n    let x = 1;\n    if x > 0 {\n        do_thing();\n    }\n}\n",
            "rust",
        )
    }

    #[test]
    fn exact_snippet_has_relevance_one() {
        let model = sample();
        let mut gatherer = LocalContextGatherer::new();
        let snippets = gatherer.get_all_context_snippets(
            &model,
            Position { line: 4, column: 0 },
            &GatherOptions::default(),
            None,
        );
        let exact = snippets.iter().find(|s| s.snippet_type == SnippetType::Exact).unwrap();
        assert_eq!(exact.relevance, 1.0);
        assert_eq!(exact.content, "        do_thing();");
    }

    #[test]
    fn parent_snippet_finds_enclosing_less_indented_line() {
        let model = sample();
        let mut gatherer = LocalContextGatherer::new();
        let snippets = gatherer.get_all_context_snippets(
            &model,
            Position { line: 4, column: 0 },
            &GatherOptions::default(),
            None,
        );
        let parent = snippets.iter().find(|s| s.snippet_type == SnippetType::Parent).unwrap();
        assert!(parent.content.contains("if x > 0"));
    }

    #[test]
    fn get_all_context_snippets_is_non_empty_whenever_model_has_a_line() {
        let model = StringModel::new("single line", "plaintext");
        let mut gatherer = LocalContextGatherer::new();
        let snippets = gatherer.get_all_context_snippets(
            &model,
            Position { line: 1, column: 0 },
            &GatherOptions::default(),
            None,
        );
        assert!(!snippets.is_empty());
    }

    #[test]
    fn snippets_are_cached_after_gathering() {
        let model = sample();
        let mut gatherer = LocalContextGatherer::new();
        let position = Position { line: 2, column: 0 };
        gatherer.get_all_context_snippets(&model, position, &GatherOptions::default(), None);
        assert!(gatherer.cached_snippets("rust", position).is_some());
    }

    #[test]
    fn clear_cache_drops_everything() {
        let model = sample();
        let mut gatherer = LocalContextGatherer::new();
        let position = Position { line: 2, column: 0 };
        gatherer.get_all_context_snippets(&model, position, &GatherOptions::default(), None);
        gatherer.clear_cache();
        assert!(gatherer.cached_snippets("rust", position).is_none());
    }

    #[test]
    fn cancellation_before_first_sub_gather_yields_empty() {
        let model = sample();
        let mut gatherer = LocalContextGatherer::new();
        let source = context_cancel::CancellationTokenSource::new();
        source.cancel();
        let token = source.token();
        let snippets =
            gatherer.get_all_context_snippets(&model, Position { line: 2, column: 0 }, &GatherOptions::default(), Some(&token));
        assert!(snippets.is_empty());
    }
}
