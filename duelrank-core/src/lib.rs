/// duelrank-core: incremental ranking from sparse pairwise comparisons.
///
/// Each item carries a Glicko-style rating and uncertainty. Every comparison
/// updates the two participants in O(1); the engine suggests the next pair to
/// compare by targeting the most uncertain item and its least predictable
/// opponent. No full comparison matrix, no IO beyond the export/restore handles
/// you pass in.
///
/// # Quick start
///
/// ```rust
/// use duelrank_core::{EngineConfig, RankingEngine};
///
/// let mut engine = RankingEngine::new(EngineConfig::default());
/// for _ in 0..4 {
///     engine.add_item();
/// }
///
/// while let Some((a, b)) = engine.next_comparison() {
///     // Ask a human (or anything else) which one they prefer.
///     let score = if a < b { 1.0 } else { 0.0 };
///     engine.apply_comparison(a, b, score, true).unwrap();
///     if engine.comparisons().len() == 10 {
///         break;
///     }
/// }
///
/// for r in engine.ranking() {
///     println!("Item {}: {:.1} ± {:.1}", r.item, r.rating, r.uncertainty);
/// }
/// ```

pub mod bradley_terry;
pub mod comparison_log;
pub mod constants;
pub mod engine;
pub mod error;
pub mod export;
pub mod glicko;
pub mod refine;
pub mod selection;
pub mod types;

// Re-export primary public API at crate root.
pub use bradley_terry::BradleyTerryRefiner;
pub use comparison_log::ComparisonLog;
pub use engine::{EngineConfig, RankingEngine};
pub use error::RankError;
pub use export::{ItemRecord, Snapshot};
pub use glicko::{d2, expected_score, g, ln_predicted_outcome_variance, predicted_outcome_variance};
pub use refine::{PerformanceRefiner, Refiner};
pub use selection::{best_opponent, best_uncertain_item, select_pair};
pub use types::{Comparison, ItemId, Pair, RankedItem, Rating};
