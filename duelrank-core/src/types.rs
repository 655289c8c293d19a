use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RATING, DEFAULT_UNCERTAINTY, MAX_UNCERTAINTY, MIN_UNCERTAINTY};
use crate::error::RankError;

/// Identity of a registered item: its index in the engine's arena.
///
/// Ids are assigned sequentially from 0 and never reused.
pub type ItemId = usize;

/// A pairing: two item ids to be compared.
pub type Pair = (ItemId, ItemId);

/// Strength estimate for a single item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rating: f64,
    /// Rating deviation. Always within `[MIN_UNCERTAINTY, MAX_UNCERTAINTY]`.
    pub uncertainty: f64,
    /// Number of comparisons that have updated this rating.
    pub comparison_count: usize,
}

impl Rating {
    /// A fresh rating with the given prior. Fails if the prior would break the
    /// update's `1 / uncertainty²` term.
    pub fn new(rating: f64, uncertainty: f64) -> Result<Self, RankError> {
        validate_prior(rating, uncertainty)?;
        Ok(Rating {
            rating,
            uncertainty,
            comparison_count: 0,
        })
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating {
            rating: DEFAULT_RATING,
            uncertainty: DEFAULT_UNCERTAINTY,
            comparison_count: 0,
        }
    }
}

pub(crate) fn validate_prior(rating: f64, uncertainty: f64) -> Result<(), RankError> {
    if rating.is_finite() && (MIN_UNCERTAINTY..=MAX_UNCERTAINTY).contains(&uncertainty) {
        Ok(())
    } else {
        Err(RankError::InvalidPrior { rating, uncertainty })
    }
}

pub(crate) fn validate_score(score: f64) -> Result<(), RankError> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(RankError::InvalidScore(score))
    }
}

/// A recorded comparison. Immutable once logged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub a: ItemId,
    pub b: ItemId,
    /// Outcome from `a`'s perspective: 1 = a preferred, 0 = b preferred, 0.5 = tie.
    pub score: f64,
}

impl Comparison {
    /// Score from `id`'s perspective, or `None` if `id` took no part.
    pub fn score_for(&self, id: ItemId) -> Option<f64> {
        if id == self.a {
            Some(self.score)
        } else if id == self.b {
            Some(1.0 - self.score)
        } else {
            None
        }
    }

    /// The other participant, or `None` if `id` took no part.
    pub fn opponent_of(&self, id: ItemId) -> Option<ItemId> {
        if id == self.a {
            Some(self.b)
        } else if id == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// One row of the current ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub item: ItemId,
    pub rating: f64,
    pub uncertainty: f64,
    pub comparison_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_rejects_bad_priors() {
        assert!(Rating::new(0.0, 350.0).is_ok());
        assert!(matches!(Rating::new(0.0, 0.0), Err(RankError::InvalidPrior { .. })));
        assert!(matches!(Rating::new(0.0, -1.0), Err(RankError::InvalidPrior { .. })));
        assert!(matches!(Rating::new(f64::NAN, 350.0), Err(RankError::InvalidPrior { .. })));
        assert!(matches!(Rating::new(0.0, f64::INFINITY), Err(RankError::InvalidPrior { .. })));
        assert!(matches!(Rating::new(0.0, 1e200), Err(RankError::InvalidPrior { .. })));
        assert!(matches!(Rating::new(0.0, 1e-200), Err(RankError::InvalidPrior { .. })));
        assert!(Rating::new(0.0, MIN_UNCERTAINTY).is_ok());
        assert!(Rating::new(0.0, MAX_UNCERTAINTY).is_ok());
    }

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(1.0).is_ok());
        assert!(validate_score(0.5).is_ok());
        assert!(matches!(validate_score(1.5), Err(RankError::InvalidScore(_))));
        assert!(matches!(validate_score(-0.1), Err(RankError::InvalidScore(_))));
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn test_comparison_perspective() {
        let c = Comparison { a: 3, b: 7, score: 0.8 };
        assert_eq!(c.score_for(3), Some(0.8));
        assert!((c.score_for(7).unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(c.score_for(1), None);
        assert_eq!(c.opponent_of(3), Some(7));
        assert_eq!(c.opponent_of(7), Some(3));
        assert_eq!(c.opponent_of(0), None);
    }
}
