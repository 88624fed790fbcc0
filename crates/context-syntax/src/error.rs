use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyntaxError>;

#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// ParseFailure (spec §7): recovered locally by callers such as the AST
    /// chunker, which should emit a fallback whole-content chunk rather than
    /// propagate this. Logged, not rethrown, by the facade itself.
    #[error("parse failure: {0}")]
    ParseFailure(String),
}
