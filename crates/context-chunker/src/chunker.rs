use crate::ast::chunk_ast;
use crate::config::{ChunkerConfig, ChunkingStrategy};
use crate::error::Result;
use crate::fixed_size::chunk_fixed_size;
use crate::language::language_for_path;
use crate::semantic::chunk_semantic;
use crate::types::Chunk;
use context_cancel::CancellationToken;
use context_syntax::SyntaxParserService;

/// Top-level chunker: validates its configuration once, then dispatches to
/// whichever of the three strategies (spec §4.1) is selected. Mirrors the
/// source's own strategy-selecting entry point, generalized to the closed
/// `ChunkingStrategy` set.
pub struct Chunker {
    config: ChunkerConfig,
    parser_service: SyntaxParserService,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, parser_service: SyntaxParserService::new() })
    }

    pub fn with_default_config() -> Self {
        Self { config: ChunkerConfig::default(), parser_service: SyntaxParserService::new() }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk `content` with no known file path or language override; the
    /// language is inferred from `file_path` when one is given, otherwise
    /// treated as plaintext.
    pub fn chunk_str(&mut self, content: &str, file_path: Option<&str>, token: Option<&CancellationToken>) -> Vec<Chunk> {
        let language = file_path.map(language_for_path).unwrap_or("plaintext");
        self.chunk_with_language(content, language, file_path, token)
    }

    pub fn chunk_with_language(
        &mut self,
        content: &str,
        language: &str,
        file_path: Option<&str>,
        token: Option<&CancellationToken>,
    ) -> Vec<Chunk> {
        match self.config.strategy {
            ChunkingStrategy::FixedSize => chunk_fixed_size(content, language, file_path, &self.config, token),
            ChunkingStrategy::Semantic => chunk_semantic(content, language, file_path, &self.config, token),
            ChunkingStrategy::Ast => {
                chunk_ast(content, language, file_path, &self.config, &mut self.parser_service, token)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_fixed_size_strategy() {
        let config = ChunkerConfig { strategy: ChunkingStrategy::FixedSize, max_chunk_size: 2000, ..Default::default() };
        let mut chunker = Chunker::new(config).unwrap();
        let chunks = chunker.chunk_str("hello world", None, None);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn dispatches_ast_strategy_with_fallback_on_unknown_language() {
        let config = ChunkerConfig { strategy: ChunkingStrategy::Ast, ..Default::default() };
        let mut chunker = Chunker::new(config).unwrap();
        let chunks = chunker.chunk_with_language("print('hi')", "cobol", None, None);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].metadata.fallback);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = ChunkerConfig { overlap: 100, min_chunk_size: 40, ..Default::default() };
        assert!(Chunker::new(config).is_err());
    }

    #[test]
    fn infers_language_from_file_path() {
        let config = ChunkerConfig { strategy: ChunkingStrategy::FixedSize, ..Default::default() };
        let mut chunker = Chunker::new(config).unwrap();
        let chunks = chunker.chunk_str("fn main() {}", Some("src/main.rs"), None);
        assert_eq!(chunks[0].metadata.language.as_deref(), Some("rust"));
    }
}
