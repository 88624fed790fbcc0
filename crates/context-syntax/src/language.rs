use crate::error::{Result, SyntaxError};

/// Languages the syntax-tree facade can actually parse. This is a strict
/// subset of the chunker's full extension table (spec §6) — languages the
/// facade does not know fail with [`SyntaxError::UnsupportedLanguage`], which
/// the AST chunking strategy treats as a parse failure and recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxLanguage {
    Rust,
    Python,
    JavaScript,
    TypeScript,
}

impl SyntaxLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxLanguage::Rust => "rust",
            SyntaxLanguage::Python => "python",
            SyntaxLanguage::JavaScript => "javascript",
            SyntaxLanguage::TypeScript => "typescript",
        }
    }

    pub fn from_str(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "rust" => Ok(SyntaxLanguage::Rust),
            "python" => Ok(SyntaxLanguage::Python),
            "javascript" => Ok(SyntaxLanguage::JavaScript),
            "typescript" => Ok(SyntaxLanguage::TypeScript),
            other => Err(SyntaxError::UnsupportedLanguage(other.to_string())),
        }
    }

    pub(crate) fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            SyntaxLanguage::Rust => tree_sitter_rust::LANGUAGE.into(),
            SyntaxLanguage::Python => tree_sitter_python::LANGUAGE.into(),
            SyntaxLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SyntaxLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}
