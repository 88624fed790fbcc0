//! Syntax-tree facade (spec §6, §4.1's AST chunking strategy, §4.6's
//! `astRelevance` factor).
//!
//! Wraps tree-sitter behind the contract the rest of the engine is allowed to
//! depend on: `parse`, `walk_tree`, `find_node_at_position`, `get_node_path`,
//! `clear_cache`. No caller outside this crate touches `tree_sitter` types
//! directly — this is the "explicit dependency injection" replacement for a
//! singleton parser service described in the design notes.

mod error;
mod language;

pub use error::{Result, SyntaxError};
pub use language::SyntaxLanguage;

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tree_sitter::{Parser, Tree};

/// A 0-based row/column position, matching tree-sitter's own convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl From<tree_sitter::Point> for Position {
    fn from(p: tree_sitter::Point) -> Self {
        Position { row: p.row, column: p.column }
    }
}

/// Result of a successful parse: an owned tree plus the source text it was
/// parsed from, so that [`SyntaxNode::text`] can slice into it.
pub struct ParseResult {
    tree: Tree,
    source: String,
}

impl ParseResult {
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { node: self.tree.root_node(), source: &self.source }
    }
}

/// A node in the parsed tree. Borrowed from the owning [`ParseResult`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    node: tree_sitter::Node<'a>,
    source: &'a str,
}

impl<'a> SyntaxNode<'a> {
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    pub fn start_position(&self) -> Position {
        self.node.start_position().into()
    }

    pub fn end_position(&self) -> Position {
        self.node.end_position().into()
    }

    pub fn text(&self) -> &'a str {
        &self.source[self.node.start_byte()..self.node.end_byte()]
    }

    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|node| SyntaxNode { node, source: self.source })
            .collect()
    }

    pub fn named_children(&self) -> Vec<SyntaxNode<'a>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|node| SyntaxNode { node, source: self.source })
            .collect()
    }

    pub fn parent(&self) -> Option<SyntaxNode<'a>> {
        self.node.parent().map(|node| SyntaxNode { node, source: self.source })
    }

    fn contains(&self, position: Position) -> bool {
        let start = self.start_position();
        let end = self.end_position();
        (start.row, start.column) <= (position.row, position.column)
            && (position.row, position.column) <= (end.row, end.column)
    }
}

/// Pre-order visit of every node under `root`, including `root` itself.
pub fn walk_tree<'a>(root: SyntaxNode<'a>, visitor: &mut impl FnMut(SyntaxNode<'a>)) {
    visitor(root);
    for child in root.children() {
        walk_tree(child, visitor);
    }
}

/// Smallest node whose range contains `position`, descending from `root`.
/// Returns `root` itself if no child contains the position.
pub fn find_node_at_position<'a>(root: SyntaxNode<'a>, position: Position) -> SyntaxNode<'a> {
    if !root.contains(position) {
        return root;
    }
    let mut best = root;
    for child in root.children() {
        if child.contains(position) {
            best = find_node_at_position(child, position);
            break;
        }
    }
    best
}

/// Ancestor chain from the root down to (and including) `node`.
pub fn get_node_path<'a>(node: SyntaxNode<'a>) -> Vec<SyntaxNode<'a>> {
    let mut path = vec![node];
    let mut current = node;
    while let Some(parent) = current.parent() {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// Stateful parser service: one tree-sitter [`Parser`] per language, plus a
/// content-hash keyed cache of previously parsed trees (`clear_cache` drops
/// it). Mirrors the AST analyzer's per-language parser construction in the
/// chunker this facade was extracted from, but is no longer owned by the
/// chunker — the orchestrator constructs one and injects it wherever AST
/// capability is needed.
pub struct SyntaxParserService {
    parsers: HashMap<SyntaxLanguage, Parser>,
    cache: HashMap<(SyntaxLanguage, [u8; 32]), Tree>,
}

impl SyntaxParserService {
    pub fn new() -> Self {
        Self { parsers: HashMap::new(), cache: HashMap::new() }
    }

    fn parser_for(&mut self, language: SyntaxLanguage) -> Result<&mut Parser> {
        if !self.parsers.contains_key(&language) {
            let mut parser = Parser::new();
            parser
                .set_language(&language.tree_sitter_language())
                .map_err(|e| SyntaxError::ParseFailure(format!("set_language: {e}")))?;
            self.parsers.insert(language, parser);
        }
        Ok(self.parsers.get_mut(&language).expect("just inserted"))
    }

    /// Parse `source` as `language`. Cached by a SHA-256 digest of the source
    /// text so re-indexing identical content does not reparse.
    pub fn parse(&mut self, source: &str, language: SyntaxLanguage) -> Result<ParseResult> {
        let digest: [u8; 32] = Sha256::digest(source.as_bytes()).into();
        if let Some(tree) = self.cache.get(&(language, digest)) {
            return Ok(ParseResult { tree: tree.clone(), source: source.to_string() });
        }

        let parser = self.parser_for(language)?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SyntaxError::ParseFailure("tree-sitter returned no tree".to_string()))?;

        self.cache.insert((language, digest), tree.clone());
        Ok(ParseResult { tree, source: source.to_string() })
    }

    /// Drop all cached parse trees. Parsers themselves are kept (construction
    /// cost, not memory, is what callers usually want to avoid repeating).
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for SyntaxParserService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUST_SRC: &str = "fn main() {\n    let x = 1;\n}\n\nstruct Point { x: i32 }\n";

    #[test]
    fn parses_rust_and_walks_every_node() {
        let mut service = SyntaxParserService::new();
        let result = service.parse(RUST_SRC, SyntaxLanguage::Rust).unwrap();

        let mut kinds = Vec::new();
        walk_tree(result.root(), &mut |node| kinds.push(node.kind().to_string()));

        assert!(kinds.contains(&"function_item".to_string()));
        assert!(kinds.contains(&"struct_item".to_string()));
    }

    #[test]
    fn find_node_at_position_descends_to_innermost() {
        let mut service = SyntaxParserService::new();
        let result = service.parse(RUST_SRC, SyntaxLanguage::Rust).unwrap();

        let found = find_node_at_position(result.root(), Position { row: 4, column: 8 });
        assert_eq!(found.kind(), "struct_item");
    }

    #[test]
    fn get_node_path_starts_at_root_ends_at_node() {
        let mut service = SyntaxParserService::new();
        let result = service.parse(RUST_SRC, SyntaxLanguage::Rust).unwrap();

        let target = find_node_at_position(result.root(), Position { row: 4, column: 8 });
        let path = get_node_path(target);

        assert_eq!(path.first().unwrap().kind(), "source_file");
        assert_eq!(path.last().unwrap().kind(), target.kind());
    }

    #[test]
    fn unsupported_language_is_rejected() {
        assert!(SyntaxLanguage::from_str("cobol").is_err());
    }

    #[test]
    fn clear_cache_does_not_error_on_reparse() {
        let mut service = SyntaxParserService::new();
        service.parse(RUST_SRC, SyntaxLanguage::Rust).unwrap();
        service.clear_cache();
        let result = service.parse(RUST_SRC, SyntaxLanguage::Rust).unwrap();
        assert_eq!(result.root().kind(), "source_file");
    }
}
