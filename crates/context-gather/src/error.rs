use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatherError>;

#[derive(Error, Debug)]
pub enum GatherError {
    #[error("the root context can never be disposed")]
    RootNotDisposable,

    #[error("context {0} still has children and cannot be disposed")]
    HasChildren(u64),

    #[error("unknown context key {0}")]
    UnknownKey(u64),
}
