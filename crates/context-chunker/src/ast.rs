use crate::config::ChunkerConfig;
use crate::language::syntax_language;
use crate::types::{chunk_id, Chunk, ChunkMetadata, ChunkType};
use context_cancel::{is_cancelled, CancellationToken};
use context_syntax::{walk_tree, Position, SyntaxLanguage, SyntaxNode, SyntaxParserService};

/// Node kinds that become their own chunk, per language. Collapsed from a
/// deeper per-language dispatch into a single lookup table — unknown kinds
/// are simply not chunkable, never an error (§9's "closed sum type, unknown
/// kinds map to a neutral default").
fn chunkable_kind(language: SyntaxLanguage, kind: &str) -> Option<ChunkType> {
    match language {
        SyntaxLanguage::Rust => match kind {
            "function_item" => Some(ChunkType::Function),
            "struct_item" => Some(ChunkType::Struct),
            "enum_item" => Some(ChunkType::Enum),
            "impl_item" => Some(ChunkType::Impl),
            "trait_item" => Some(ChunkType::Interface),
            "mod_item" => Some(ChunkType::Module),
            "const_item" => Some(ChunkType::Const),
            "static_item" => Some(ChunkType::Variable),
            _ => None,
        },
        SyntaxLanguage::Python => match kind {
            "function_definition" => Some(ChunkType::Function),
            "class_definition" => Some(ChunkType::Class),
            _ => None,
        },
        SyntaxLanguage::JavaScript | SyntaxLanguage::TypeScript => match kind {
            "function_declaration" => Some(ChunkType::Function),
            "class_declaration" => Some(ChunkType::Class),
            "method_definition" => Some(ChunkType::Method),
            "interface_declaration" => Some(ChunkType::Interface),
            "enum_declaration" => Some(ChunkType::Enum),
            _ => None,
        },
    }
}

/// AST chunking strategy (spec §4.1). Emits one chunk per chunkable node
/// kind, below `min_chunk_size` nodes are skipped, `parent_id` mirrors the
/// tree's own parent/child structure. Never throws: an unsupported language,
/// a parse failure, or a tree with no chunkable nodes all fall back to a
/// single whole-content chunk tagged `fallback: true` (spec §8 scenario 4).
pub fn chunk_ast(
    content: &str,
    language_id: &str,
    file_path: Option<&str>,
    config: &ChunkerConfig,
    parser_service: &mut SyntaxParserService,
    token: Option<&CancellationToken>,
) -> Vec<Chunk> {
    if content.is_empty() {
        return Vec::new();
    }

    let parsed = syntax_language(language_id)
        .and_then(|lang| parser_service.parse(content, lang).ok().map(|result| (lang, result)));

    let Some((lang, parse_result)) = parsed else {
        return vec![fallback_chunk(content, language_id, file_path)];
    };

    let mut nodes = Vec::new();
    walk_tree(parse_result.root(), &mut |node| nodes.push(node));

    let mut chunked: Vec<((Position, Position), String)> = Vec::new();
    let mut chunks = Vec::new();
    let mut index = 0usize;

    for node in nodes {
        if is_cancelled(token) {
            break;
        }
        let Some(chunk_type) = chunkable_kind(lang, node.kind()) else { continue };

        let text = node.text();
        if text.len() < config.min_chunk_size {
            continue;
        }

        let parent_id = find_chunked_ancestor(node, &chunked);
        let start_line = node.start_position().row;
        let end_line = node.end_position().row;

        let metadata = ChunkMetadata {
            start_line,
            end_line,
            parent_id,
            chunk_type: Some(chunk_type),
            language: Some(language_id.to_string()),
            file_path: file_path.map(str::to_string),
            estimated_tokens: ChunkMetadata::estimate_tokens_from_content(text),
            ..Default::default()
        };

        let id = chunk_id(file_path, index, text);
        chunked.push(((node.start_position(), node.end_position()), id.clone()));
        chunks.push(Chunk::new(id, text.to_string(), metadata));
        index += 1;
    }

    if chunks.is_empty() && !is_cancelled(token) {
        return vec![fallback_chunk(content, language_id, file_path)];
    }

    chunks
}

fn find_chunked_ancestor(node: SyntaxNode<'_>, chunked: &[((Position, Position), String)]) -> Option<String> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        let key = (ancestor.start_position(), ancestor.end_position());
        if let Some((_, id)) = chunked.iter().find(|(k, _)| *k == key) {
            return Some(id.clone());
        }
        current = ancestor.parent();
    }
    None
}

fn fallback_chunk(content: &str, language_id: &str, file_path: Option<&str>) -> Chunk {
    let id = chunk_id(file_path, 0, content);
    let end_line = content.matches('\n').count();
    let metadata = ChunkMetadata {
        start_line: 0,
        end_line,
        language: Some(language_id.to_string()),
        file_path: file_path.map(str::to_string),
        estimated_tokens: ChunkMetadata::estimate_tokens_from_content(content),
        fallback: true,
        ..Default::default()
    };
    Chunk::new(id, content.to_string(), metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChunkerConfig {
        ChunkerConfig { min_chunk_size: 0, ..Default::default() }
    }

    #[test]
    fn unsupported_language_falls_back_to_whole_content() {
        let content = "10 PRINT \"HELLO\"\n20 GOTO 10\n";
        let mut service = SyntaxParserService::new();
        let chunks = chunk_ast(content, "basic", None, &config(), &mut service, None);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].metadata.fallback);
        assert_eq!(chunks[0].content, content);
    }

    #[test]
    fn rust_source_yields_function_and_struct_chunks() {
        let content = "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n\nstruct Point { x: i32, y: i32 }\n";
        let mut service = SyntaxParserService::new();
        let chunks = chunk_ast(content, "rust", None, &config(), &mut service, None);

        assert!(chunks.iter().any(|c| c.metadata.chunk_type == Some(ChunkType::Function)));
        assert!(chunks.iter().any(|c| c.metadata.chunk_type == Some(ChunkType::Struct)));
        assert!(chunks.iter().all(|c| !c.metadata.fallback));
    }

    #[test]
    fn nested_function_points_parent_id_at_enclosing_impl() {
        let content = "impl Foo {\n    fn bar(&self) -> i32 {\n        1\n    }\n}\n";
        let mut service = SyntaxParserService::new();
        let chunks = chunk_ast(content, "rust", None, &config(), &mut service, None);

        let impl_chunk = chunks.iter().find(|c| c.metadata.chunk_type == Some(ChunkType::Impl)).unwrap();
        let fn_chunk = chunks.iter().find(|c| c.metadata.chunk_type == Some(ChunkType::Function)).unwrap();
        assert_eq!(fn_chunk.metadata.parent_id.as_deref(), Some(impl_chunk.id.as_str()));
    }

    #[test]
    fn empty_content_yields_no_chunks() {
        let mut service = SyntaxParserService::new();
        assert!(chunk_ast("", "rust", None, &config(), &mut service, None).is_empty());
    }

    #[test]
    fn cancellation_before_any_node_falls_back_to_empty() {
        let source = context_cancel::CancellationTokenSource::new();
        source.cancel();
        let token = source.token();
        let mut service = SyntaxParserService::new();
        let chunks = chunk_ast("fn main() {}", "rust", None, &config(), &mut service, Some(&token));
        assert!(chunks.is_empty());
    }
}
