/// Snapshot export and restore.
///
/// Format: a single JSON document.
///
/// ```json
/// {
///   "version": 1,
///   "items": [{ "id": 0, "rating": 162.2, "uncertainty": 290.2, "comparison_count": 1 }],
///   "comparisons": [{ "a": 0, "b": 1, "score": 1.0 }]
/// }
/// ```
///
/// `items` is in id order and `comparisons` in log order. Floats round-trip
/// exactly. The exclusion set is not part of the snapshot.
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::comparison_log::ComparisonLog;
use crate::constants::SNAPSHOT_VERSION;
use crate::engine::{EngineConfig, RankingEngine};
use crate::error::RankError;
use crate::types::{validate_prior, validate_score, ItemId, Rating};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub rating: f64,
    pub uncertainty: f64,
    pub comparison_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub items: Vec<ItemRecord>,
    pub comparisons: ComparisonLog,
}

impl Snapshot {
    /// Check engine invariants and split into ratings and log.
    fn into_parts(self) -> Result<(Vec<Rating>, ComparisonLog), RankError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(RankError::InvalidSnapshot(format!(
                "unsupported version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }

        let mut ratings = Vec::with_capacity(self.items.len());
        for (expected_id, record) in self.items.into_iter().enumerate() {
            if record.id != expected_id {
                return Err(RankError::InvalidSnapshot(format!(
                    "item ids must be sequential from 0: found {} at position {}",
                    record.id, expected_id
                )));
            }
            validate_prior(record.rating, record.uncertainty)?;
            ratings.push(Rating {
                rating: record.rating,
                uncertainty: record.uncertainty,
                comparison_count: record.comparison_count,
            });
        }

        let len = ratings.len();
        for c in &self.comparisons {
            if c.a >= len || c.b >= len {
                return Err(RankError::InvalidSnapshot(format!(
                    "comparison ({}, {}) references an unknown item ({} items)",
                    c.a, c.b, len
                )));
            }
            if c.a == c.b {
                return Err(RankError::InvalidSnapshot(format!(
                    "comparison of item {} with itself",
                    c.a
                )));
            }
            validate_score(c.score)?;
        }

        Ok((ratings, self.comparisons))
    }
}

impl RankingEngine {
    /// Current durable state as a serde value.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            items: self
                .ratings()
                .iter()
                .enumerate()
                .map(|(id, r)| ItemRecord {
                    id,
                    rating: r.rating,
                    uncertainty: r.uncertainty,
                    comparison_count: r.comparison_count,
                })
                .collect(),
            comparisons: self.comparisons().clone(),
        }
    }

    /// Write every item's rating state and the comparison log as JSON.
    pub fn export_ratings<W: Write>(&self, sink: W) -> Result<(), RankError> {
        serde_json::to_writer_pretty(sink, &self.snapshot())?;
        tracing::debug!(
            items = self.num_items(),
            comparisons = self.comparisons().len(),
            "exported ratings"
        );
        Ok(())
    }

    /// Rebuild an engine from a snapshot value.
    pub fn from_snapshot(snapshot: Snapshot, config: EngineConfig) -> Result<Self, RankError> {
        let (ratings, log) = snapshot.into_parts()?;
        tracing::debug!(items = ratings.len(), comparisons = log.len(), "restored engine");
        Ok(RankingEngine::from_parts(ratings, log, config))
    }

    /// Rebuild an engine from JSON written by `export_ratings`.
    pub fn restore<R: Read>(source: R, config: EngineConfig) -> Result<Self, RankError> {
        let snapshot: Snapshot = serde_json::from_reader(source)?;
        Self::from_snapshot(snapshot, config)
    }
}
