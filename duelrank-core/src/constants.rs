/// Scale constant tying rating units to the odds-ratio model: `ln(10) / 400`.
pub const Q: f64 = std::f64::consts::LN_10 / 400.0;

/// Prior rating given to items registered without an explicit one.
pub const DEFAULT_RATING: f64 = 0.0;

/// Prior uncertainty (rating deviation) for items we know nothing about.
pub const DEFAULT_UNCERTAINTY: f64 = 350.0;

/// Accepted range for any uncertainty, prior or updated.
///
/// Outside it `1 / uncertainty²` or `g` lose all precision: far above, `g`
/// rounds to 0 and the update computes `inf * 0`; far below, the precision
/// term overflows and the updated uncertainty collapses to 0.
pub const MIN_UNCERTAINTY: f64 = 1e-6;
pub const MAX_UNCERTAINTY: f64 = 1e6;

/// Expected scores are kept within `[EPS, 1 - EPS]` inside the update.
///
/// When two ratings are far enough apart, `1 / (1 + 10^x)` rounds to exactly
/// 0 or 1 and `d2` divides by zero. Clamping keeps `d2` finite so a lopsided
/// matchup still produces a finite rating and a (tiny) uncertainty decrease.
pub const EXPECTED_SCORE_EPSILON: f64 = 1e-9;

/// Version tag written into exported snapshots.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Ghost player regularization strength for the Bradley-Terry refiner.
pub const DEFAULT_REGULARIZATION_STRENGTH: f64 = 0.01;

/// Iteration cap for the Bradley-Terry refiner.
pub const DEFAULT_BT_ITERATIONS: usize = 100;

/// Stop Bradley-Terry iterations once no strength moves more than this.
pub const BT_CONVERGENCE_THRESHOLD: f64 = 1e-6;

/// Outcomes are pulled toward 0.5 by this factor before solving for a
/// performance rating, so a perfect record doesn't send a rating to the bound.
pub const DEFAULT_SHRINK_FACTOR: f64 = 0.95;

/// Bisection window for performance ratings.
pub const PERFORMANCE_RATING_MIN: f64 = -4000.0;
pub const PERFORMANCE_RATING_MAX: f64 = 4000.0;

/// Cap on outer fixed-point passes in the performance refiner.
pub const DEFAULT_PERFORMANCE_ITERATIONS: usize = 1000;
