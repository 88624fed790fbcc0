//! TF-IDF sparse index over chunks (spec §4.2, component C3).

mod index;
mod tokenize;
mod types;

pub use index::SparseIndex;
pub use tokenize::tokenize;
pub use types::{normalize, TfIdfScore};
