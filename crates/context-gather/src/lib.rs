//! Local-context gatherer and hierarchical context-key store
//! (spec §4.5 and §9, component C6).

mod context_key;
mod error;
mod gatherer;
mod model;
mod snippet;

pub use context_key::{ContextKeyId, ContextStore};
pub use error::{GatherError, Result};
pub use gatherer::{GatherOptions, LocalContextGatherer, Position};
pub use model::{StringModel, TextModel};
pub use snippet::{CodeSnippet, SnippetType};
