/// Batch re-estimation of ratings from the full comparison log.
///
/// The incremental update folds each comparison in once, in arrival order. A
/// `Refiner` looks at every comparison jointly and proposes a fresh rating for
/// every item. It is a strategy object: the engine's incremental path does not
/// depend on any refiner existing.
use crate::comparison_log::ComparisonLog;
use crate::constants::{
    DEFAULT_PERFORMANCE_ITERATIONS, DEFAULT_SHRINK_FACTOR, PERFORMANCE_RATING_MAX,
    PERFORMANCE_RATING_MIN,
};
use crate::types::{Comparison, Rating};

pub trait Refiner {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// One refined rating per item, in id order.
    ///
    /// `log` may come from anywhere, so comparisons naming an id outside
    /// `items` must be ignored rather than indexed.
    fn refine(&self, items: &[Rating], log: &ComparisonLog) -> Vec<f64>;
}

/// Comparisons of `log` whose ids both index into a population of
/// `num_items`. Anything else is skipped with a warning.
pub(crate) fn known_comparisons(
    log: &ComparisonLog,
    num_items: usize,
) -> impl Iterator<Item = &Comparison> {
    log.iter().filter(move |c| {
        let known = c.a < num_items && c.b < num_items;
        if !known {
            tracing::warn!(a = c.a, b = c.b, num_items, "skipping comparison with unknown item");
        }
        known
    })
}

/// Shift `ratings` so their mean equals `target_mean`.
pub(crate) fn recenter(ratings: &mut [f64], target_mean: f64) {
    if ratings.is_empty() {
        return;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    let shift = target_mean - mean;
    for r in ratings.iter_mut() {
        *r += shift;
    }
}

pub(crate) fn mean_rating(items: &[Rating]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(|r| r.rating).sum::<f64>() / items.len() as f64
}

/// Performance-rating refiner.
///
/// For every item, solve for the rating that would make its expected total
/// score against the opponents it actually met equal its (shrunk) actual
/// total. The new rating is the mean of that performance and the item's
/// incremental rating. Repeat with the new opponent ratings until nothing
/// moves by more than `epsilon`.
#[derive(Debug, Clone)]
pub struct PerformanceRefiner {
    /// Pulls each outcome toward 0.5: `(s - 0.5) * shrink_factor + 0.5`.
    pub shrink_factor: f64,
    pub epsilon: f64,
    pub rating_min: f64,
    pub rating_max: f64,
    pub max_iterations: usize,
}

impl Default for PerformanceRefiner {
    fn default() -> Self {
        PerformanceRefiner {
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            epsilon: 1e-3,
            rating_min: PERFORMANCE_RATING_MIN,
            rating_max: PERFORMANCE_RATING_MAX,
            max_iterations: DEFAULT_PERFORMANCE_ITERATIONS,
        }
    }
}

impl PerformanceRefiner {
    /// The rating in `[rating_min, rating_max]` whose expected total score
    /// against `opponents` equals `score`, by bisection.
    pub fn performance_rating(&self, opponents: &[f64], score: f64) -> f64 {
        let (mut low, mut high) = (self.rating_min, self.rating_max);
        // Bisect to well below the outer convergence threshold.
        let tolerance = self.epsilon * 1e-3;
        while high - low > tolerance {
            let mid = (low + high) / 2.0;
            let expected: f64 = opponents
                .iter()
                .map(|&opp| 1.0 / (1.0 + 10f64.powf((opp - mid) / 400.0)))
                .sum();
            if expected < score {
                low = mid;
            } else {
                high = mid;
            }
        }
        ((low + high) / 2.0).clamp(self.rating_min, self.rating_max)
    }
}

impl Refiner for PerformanceRefiner {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn refine(&self, items: &[Rating], log: &ComparisonLog) -> Vec<f64> {
        let anchors: Vec<f64> = items.iter().map(|r| r.rating).collect();
        let mut ratings = anchors.clone();

        // Per item: (opponent ids, shrunk total score). Fixed across passes.
        let mut opponents: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
        let mut scores = vec![0.0; items.len()];
        for c in known_comparisons(log, items.len()) {
            opponents[c.a].push(c.b);
            opponents[c.b].push(c.a);
            scores[c.a] += (c.score - 0.5) * self.shrink_factor + 0.5;
            scores[c.b] += (0.5 - c.score) * self.shrink_factor + 0.5;
        }

        let mut converged = false;
        for _ in 0..self.max_iterations {
            let mut next = ratings.clone();
            for (idx, opps) in opponents.iter().enumerate() {
                if opps.is_empty() {
                    continue;
                }
                let opp_ratings: Vec<f64> = opps.iter().map(|&j| ratings[j]).collect();
                let performance = self.performance_rating(&opp_ratings, scores[idx]);
                next[idx] = (anchors[idx] + performance) / 2.0;
            }

            let max_change = next
                .iter()
                .zip(&ratings)
                .map(|(new, old)| (new - old).abs())
                .fold(0.0_f64, f64::max);
            ratings = next;
            if max_change < self.epsilon {
                converged = true;
                break;
            }
        }
        if !converged {
            tracing::warn!(max_iterations = self.max_iterations, "performance refiner did not converge");
        }

        recenter(&mut ratings, mean_rating(items));
        ratings
    }
}
