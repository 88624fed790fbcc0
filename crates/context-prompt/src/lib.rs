//! Deterministic prompt assembly (spec §4.8, component C10).

mod builder;
mod estimate;
mod types;

pub use builder::build_prompt;
pub use estimate::{EstimateTokens, WordCountEstimator};
pub use types::{ModelCapabilities, PromptMetadata, PromptResult, PromptSnippet};
