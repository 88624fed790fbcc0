use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("no embedding provider registered for id \"{0}\"")]
    NoSuchProvider(String),
}
