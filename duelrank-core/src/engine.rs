/// Ranking engine orchestrator.
///
/// Pure computation: no async, no IO beyond the `Write`/`Read` handles the
/// caller passes to export and restore. The caller asks what to compare,
/// obtains an outcome externally, then feeds it back.
///
/// Items are identified by sequential `usize` ids handed out by `add_item`.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::comparison_log::ComparisonLog;
use crate::constants::{DEFAULT_RATING, DEFAULT_UNCERTAINTY};
use crate::error::RankError;
use crate::refine::Refiner;
use crate::selection::select_pair;
use crate::types::{validate_prior, validate_score, Comparison, ItemId, Pair, RankedItem, Rating};

/// Configuration for the ranking engine. Fixed for the engine's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Withhold the two items just compared from the very next suggestion.
    pub avoid_repeat: bool,
    /// Prior used by `add_item`.
    pub default_rating: f64,
    pub default_uncertainty: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            avoid_repeat: true,
            default_rating: DEFAULT_RATING,
            default_uncertainty: DEFAULT_UNCERTAINTY,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// ```
    /// use duelrank_core::EngineConfig;
    ///
    /// let config = EngineConfig::from_toml_str("avoid_repeat = false\ndefault_rating = 1500.0").unwrap();
    /// assert!(!config.avoid_repeat);
    /// assert_eq!(config.default_uncertainty, 350.0);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, RankError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RankError> {
        validate_prior(self.default_rating, self.default_uncertainty)
    }
}

#[derive(Debug)]
pub struct RankingEngine {
    /// Arena of ratings; an item's id is its index.
    items: Vec<Rating>,

    log: ComparisonLog,

    /// Ids withheld from the next suggested pair. Only populated when
    /// `config.avoid_repeat` is set.
    excluded: BTreeSet<ItemId>,

    config: EngineConfig,
}

impl Default for RankingEngine {
    fn default() -> Self {
        RankingEngine::new(EngineConfig::default())
    }
}

impl RankingEngine {
    /// Build an engine. An invalid default prior is replaced by the built-in
    /// one; use `EngineConfig::validate` first to reject it instead.
    pub fn new(mut config: EngineConfig) -> Self {
        if config.validate().is_err() {
            tracing::warn!(
                default_rating = config.default_rating,
                default_uncertainty = config.default_uncertainty,
                "invalid default prior in config, using built-in defaults"
            );
            config.default_rating = DEFAULT_RATING;
            config.default_uncertainty = DEFAULT_UNCERTAINTY;
        }
        RankingEngine {
            items: Vec::new(),
            log: ComparisonLog::new(),
            excluded: BTreeSet::new(),
            config,
        }
    }

    pub(crate) fn from_parts(items: Vec<Rating>, log: ComparisonLog, config: EngineConfig) -> Self {
        let mut engine = RankingEngine::new(config);
        engine.items = items;
        engine.log = log;
        engine
    }

    /// Register an item with the configured default prior.
    pub fn add_item(&mut self) -> ItemId {
        let rating = Rating {
            rating: self.config.default_rating,
            uncertainty: self.config.default_uncertainty,
            comparison_count: 0,
        };
        self.push_item(rating)
    }

    /// Register an item with an explicit prior.
    pub fn add_item_with_prior(&mut self, rating: f64, uncertainty: f64) -> Result<ItemId, RankError> {
        let rating = Rating::new(rating, uncertainty)?;
        Ok(self.push_item(rating))
    }

    fn push_item(&mut self, rating: Rating) -> ItemId {
        let id = self.items.len();
        self.items.push(rating);
        tracing::debug!(id, rating = rating.rating, uncertainty = rating.uncertainty, "registered item");
        id
    }

    /// Number of registered items.
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// The pair expected to be most informative, or `None` when the population
    /// is empty or too few items are eligible.
    pub fn next_comparison(&self) -> Option<Pair> {
        select_pair(&self.items, &self.excluded)
    }

    /// Record an outcome. `score` is from `a`'s perspective.
    ///
    /// The comparison is always appended to the log. With `update_ratings`
    /// both items are updated from their pre-comparison states: `a` with
    /// `score`, `b` with `1 - score`. With `avoid_repeat`, the exclusion set
    /// becomes exactly `{a, b}`.
    ///
    /// Nothing changes if validation fails.
    pub fn apply_comparison(
        &mut self,
        a: ItemId,
        b: ItemId,
        score: f64,
        update_ratings: bool,
    ) -> Result<(), RankError> {
        self.check_id(a)?;
        self.check_id(b)?;
        if a == b {
            return Err(RankError::SelfComparison(a));
        }
        validate_score(score)?;

        self.log.push(Comparison { a, b, score });

        if update_ratings {
            let before_a = self.items[a];
            let before_b = self.items[b];
            self.items[a].update(score, before_b.rating, before_b.uncertainty);
            self.items[b].update(1.0 - score, before_a.rating, before_a.uncertainty);
            tracing::debug!(
                a,
                b,
                score,
                delta_a = self.items[a].rating - before_a.rating,
                delta_b = self.items[b].rating - before_b.rating,
                "applied comparison"
            );
        } else {
            tracing::debug!(a, b, score, "logged comparison without rating update");
        }

        if self.config.avoid_repeat {
            self.excluded.clear();
            self.excluded.insert(a);
            self.excluded.insert(b);
        }
        Ok(())
    }

    pub fn rating_of(&self, id: ItemId) -> Result<Rating, RankError> {
        self.check_id(id)?;
        Ok(self.items[id])
    }

    /// All items, highest rating first. Equal ratings keep id order.
    pub fn ranking(&self) -> Vec<RankedItem> {
        let mut ranked: Vec<RankedItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(item, r)| RankedItem {
                item,
                rating: r.rating,
                uncertainty: r.uncertainty,
                comparison_count: r.comparison_count,
            })
            .collect();
        ranked.sort_by(|x, y| y.rating.total_cmp(&x.rating));
        ranked
    }

    /// Replace every rating with a batch estimate computed from the full log.
    ///
    /// Uncertainties and comparison counts are left alone. If the refiner
    /// returns anything other than one finite rating per item, nothing changes.
    pub fn refine_ratings(&mut self, refiner: &dyn Refiner) -> Result<(), RankError> {
        let refined = refiner.refine(&self.items, &self.log);
        if refined.len() != self.items.len() {
            return Err(RankError::InvalidRefinement {
                expected: self.items.len(),
                got: refined.len(),
            });
        }
        if let Some((id, &rating)) = refined.iter().enumerate().find(|(_, r)| !r.is_finite()) {
            return Err(RankError::NonFiniteRefinement { id, rating });
        }

        let max_change = self
            .items
            .iter()
            .zip(&refined)
            .map(|(old, new)| (new - old.rating).abs())
            .fold(0.0_f64, f64::max);

        for (item, rating) in self.items.iter_mut().zip(refined) {
            item.rating = rating;
        }
        tracing::debug!(refiner = refiner.name(), max_change, "refined ratings from comparison log");
        Ok(())
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.items
    }

    pub fn comparisons(&self) -> &ComparisonLog {
        &self.log
    }

    /// Ids withheld from the next suggestion.
    pub fn excluded(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.excluded.iter().copied()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn check_id(&self, id: ItemId) -> Result<(), RankError> {
        if id < self.items.len() {
            Ok(())
        } else {
            Err(RankError::InvalidIdentity { id, len: self.items.len() })
        }
    }
}
