use context_syntax::SyntaxLanguage;
use std::path::Path;

/// File extension → language id mapping (spec §6, verbatim). Anything not
/// listed maps to `"plaintext"`.
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "js" => "javascript",
        "ts" => "typescript",
        "jsx" => "javascript",
        "tsx" => "typescript",
        "py" => "python",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "php" => "php",
        "rb" => "ruby",
        "swift" => "swift",
        "kt" => "kotlin",
        "scala" => "scala",
        "sh" => "shell",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "md" => "markdown",
        "yaml" | "yml" => "yaml",
        "xml" => "xml",
        "sql" => "sql",
        _ => "plaintext",
    }
}

pub fn language_for_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(language_for_extension)
        .unwrap_or("plaintext")
}

/// Languages for which the AST chunking strategy can engage the syntax-tree
/// facade. Everything else falls back to fixed-size/semantic chunking.
pub fn syntax_language(language_id: &str) -> Option<SyntaxLanguage> {
    SyntaxLanguage::from_str(language_id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(language_for_extension("rs"), "rust");
        assert_eq!(language_for_extension("TSX"), "typescript");
        assert_eq!(language_for_extension("yml"), "yaml");
        assert_eq!(language_for_extension("yaml"), "yaml");
    }

    #[test]
    fn unknown_extension_is_plaintext() {
        assert_eq!(language_for_extension("xyz"), "plaintext");
    }

    #[test]
    fn path_without_extension_is_plaintext() {
        assert_eq!(language_for_path("Makefile"), "plaintext");
    }

    #[test]
    fn only_ast_capable_languages_resolve() {
        assert!(syntax_language("rust").is_some());
        assert!(syntax_language("go").is_none());
    }
}
