/// Iterative maximum-likelihood Bradley-Terry estimation over the whole log.
///
/// Fractional outcomes count as fractional wins (`score` for `a`, `1 - score`
/// for `b`). A ghost player that every item has tied a small number of times
/// keeps items with no wins (or no losses) at a finite strength.
use std::collections::HashMap;

use crate::comparison_log::ComparisonLog;
use crate::constants::{
    BT_CONVERGENCE_THRESHOLD, DEFAULT_BT_ITERATIONS, DEFAULT_REGULARIZATION_STRENGTH,
};
use crate::refine::{known_comparisons, mean_rating, recenter, Refiner};
use crate::types::Rating;

pub struct BradleyTerry {
    num_items: usize,
    /// wins[i] maps opponent -> fractional wins of i over that opponent.
    /// Index `num_items` is the ghost.
    wins: Vec<HashMap<usize, f64>>,
    total_wins: Vec<f64>,
    strengths: Vec<f64>,
}

impl BradleyTerry {
    /// Comparisons naming an id `>= num_items` are skipped.
    pub fn new(num_items: usize, log: &ComparisonLog, regularization_strength: f64) -> Self {
        let ghost = num_items;
        let mut wins: Vec<HashMap<usize, f64>> = vec![HashMap::new(); num_items + 1];

        for c in known_comparisons(log, num_items) {
            *wins[c.a].entry(c.b).or_insert(0.0) += c.score;
            *wins[c.b].entry(c.a).or_insert(0.0) += 1.0 - c.score;
        }

        if regularization_strength > 0.0 {
            for i in 0..num_items {
                *wins[i].entry(ghost).or_insert(0.0) += regularization_strength;
                *wins[ghost].entry(i).or_insert(0.0) += regularization_strength;
            }
        }

        let total_wins = wins.iter().map(|row| row.values().sum()).collect();

        BradleyTerry {
            num_items,
            wins,
            total_wins,
            strengths: vec![1.0; num_items + 1],
        }
    }

    fn wins_of(&self, i: usize, j: usize) -> f64 {
        self.wins[i].get(&j).copied().unwrap_or(0.0)
    }

    /// One minorization-maximization step:
    /// `s_i ← W_i / Σ_j n_ij / (s_i + s_j)`.
    fn step(&mut self) {
        let next: Vec<f64> = (0..self.strengths.len())
            .map(|i| {
                if self.total_wins[i] == 0.0 {
                    return 0.0;
                }
                let s_i = self.strengths[i];
                let denominator: f64 = self.wins[i]
                    .iter()
                    .map(|(&j, &w_ij)| {
                        let games = w_ij + self.wins_of(j, i);
                        let s_sum = s_i + self.strengths[j];
                        if games > 0.0 && s_sum > 0.0 { games / s_sum } else { 0.0 }
                    })
                    .sum();
                if denominator > 0.0 { self.total_wins[i] / denominator } else { s_i }
            })
            .collect();
        self.strengths = next;
    }

    /// Divide by the geometric mean of the non-zero strengths.
    fn normalize(&mut self) {
        let logs: Vec<f64> = self.strengths.iter().filter(|&&s| s > 0.0).map(|s| s.ln()).collect();
        if logs.is_empty() {
            return;
        }
        let geo_mean = (logs.iter().sum::<f64>() / logs.len() as f64).exp();
        for s in &mut self.strengths {
            *s /= geo_mean;
        }
    }

    /// Iterate until no strength moves more than the convergence threshold.
    /// Returns whether that happened within `max_iterations`.
    pub fn fit(&mut self, max_iterations: usize) -> bool {
        for _ in 0..max_iterations {
            let old = self.strengths.clone();
            self.step();
            self.normalize();

            let max_change = self
                .strengths
                .iter()
                .zip(&old)
                .map(|(new, old)| (new - old).abs())
                .fold(0.0_f64, f64::max);
            if max_change < BT_CONVERGENCE_THRESHOLD {
                return true;
            }
        }
        false
    }

    /// Strengths of the real items (ghost excluded).
    pub fn strengths(&self) -> &[f64] {
        &self.strengths[..self.num_items]
    }

    /// Strengths on the rating scale: `400 · log10(s)`, so a 400-point gap
    /// means 10:1 odds, matching the incremental model.
    pub fn ratings(&self) -> Vec<f64> {
        self.strengths().iter().map(|&s| 400.0 * s.log10()).collect()
    }
}

/// Refiner backed by a regularized Bradley-Terry fit.
#[derive(Debug, Clone)]
pub struct BradleyTerryRefiner {
    /// Must be positive, otherwise an item that never won has zero strength
    /// and no finite rating.
    pub regularization_strength: f64,
    pub max_iterations: usize,
}

impl Default for BradleyTerryRefiner {
    fn default() -> Self {
        BradleyTerryRefiner {
            regularization_strength: DEFAULT_REGULARIZATION_STRENGTH,
            max_iterations: DEFAULT_BT_ITERATIONS,
        }
    }
}

impl Refiner for BradleyTerryRefiner {
    fn name(&self) -> &'static str {
        "bradley-terry"
    }

    fn refine(&self, items: &[Rating], log: &ComparisonLog) -> Vec<f64> {
        let mut bt = BradleyTerry::new(items.len(), log, self.regularization_strength);
        if !bt.fit(self.max_iterations) {
            tracing::warn!(max_iterations = self.max_iterations, "bradley-terry fit did not converge");
        }
        let mut ratings = bt.ratings();
        recenter(&mut ratings, mean_rating(items));
        ratings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Comparison;

    fn log_of(entries: &[(usize, usize, f64)]) -> ComparisonLog {
        entries.iter().map(|&(a, b, score)| Comparison { a, b, score }).collect()
    }

    #[test]
    fn test_basic_ranking() {
        let log = log_of(&[(0, 1, 0.9), (0, 2, 0.8), (1, 2, 0.7)]);
        let mut bt = BradleyTerry::new(3, &log, 0.01);
        bt.fit(100);
        let s = bt.strengths();
        assert!(s[0] > s[1]);
        assert!(s[1] > s[2]);
    }

    #[test]
    fn test_no_comparisons_equal_strengths() {
        let mut bt = BradleyTerry::new(2, &ComparisonLog::new(), 0.01);
        bt.fit(100);
        let s = bt.strengths();
        assert!((s[0] - s[1]).abs() < 0.01);
    }

    #[test]
    fn test_single_outcome_matches_odds() {
        // With negligible regularization, a 0.75 outcome means 3:1 odds.
        let log = log_of(&[(0, 1, 0.75)]);
        let mut bt = BradleyTerry::new(2, &log, 1e-9);
        bt.fit(10_000);
        let s = bt.strengths();
        assert!((s[0] / s[1] - 3.0).abs() < 0.01, "ratio {}", s[0] / s[1]);
    }

    #[test]
    fn test_refiner_output_on_rating_scale() {
        let items: Vec<Rating> = (0..3).map(|_| Rating::default()).collect();
        let log = log_of(&[(0, 1, 0.9), (0, 2, 0.8), (1, 2, 0.7)]);
        let refined = BradleyTerryRefiner::default().refine(&items, &log);

        assert_eq!(refined.len(), 3);
        assert!(refined.iter().all(|r| r.is_finite()));
        assert!(refined[0] > refined[1] && refined[1] > refined[2]);
        assert!(refined.iter().sum::<f64>().abs() < 1e-6);
    }

    #[test]
    fn test_refiner_undefeated_item_stays_finite() {
        let items: Vec<Rating> = (0..3).map(|_| Rating::new(1500.0, 350.0).unwrap()).collect();
        let log = log_of(&[(0, 1, 1.0), (0, 2, 1.0), (0, 1, 1.0)]);
        let refined = BradleyTerryRefiner::default().refine(&items, &log);
        assert!(refined.iter().all(|r| r.is_finite()));
        assert!(refined[0] > refined[1]);
        let mean = refined.iter().sum::<f64>() / 3.0;
        assert!((mean - 1500.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_items_in_log_are_skipped() {
        let items: Vec<Rating> = (0..2).map(|_| Rating::default()).collect();
        let log = log_of(&[(0, 1, 0.75), (0, 2, 1.0), (9, 1, 0.0)]);
        let refined = BradleyTerryRefiner::default().refine(&items, &log);
        let expected = BradleyTerryRefiner::default().refine(&items, &log_of(&[(0, 1, 0.75)]));
        assert_eq!(refined.len(), 2);
        for (got, want) in refined.iter().zip(&expected) {
            assert!((got - want).abs() < 1e-9);
        }
    }
}
