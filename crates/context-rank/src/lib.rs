//! Multi-factor ranking (spec §4.6, component C8).

mod rank;
mod types;

pub use rank::rank;
pub use types::{FactorWeights, NormalizationStrategy, RankConfig, RankedItem, ScoreFactors};
