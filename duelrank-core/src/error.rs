use thiserror::Error;

use crate::types::ItemId;

/// Errors surfaced at the engine's API boundary.
///
/// All of these are recoverable: the engine state is unchanged when one is
/// returned, and the caller decides whether to retry or give up.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("unknown item id {id} (engine has {len} items)")]
    InvalidIdentity { id: ItemId, len: usize },

    #[error("score {0} is outside [0, 1]")]
    InvalidScore(f64),

    #[error("item {0} cannot be compared with itself")]
    SelfComparison(ItemId),

    #[error("invalid prior: rating {rating}, uncertainty {uncertainty} (rating must be finite, uncertainty within [1e-6, 1e6])")]
    InvalidPrior { rating: f64, uncertainty: f64 },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("refiner returned {got} ratings for {expected} items")]
    InvalidRefinement { expected: usize, got: usize },

    #[error("refiner returned a non-finite rating ({rating}) for item {id}")]
    NonFiniteRefinement { id: ItemId, rating: f64 },

    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}
