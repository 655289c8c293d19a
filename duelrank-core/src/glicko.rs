/// Glicko-style single-comparison rating update.
///
/// Everything here is a pure function of the two participants' `(rating,
/// uncertainty)` pairs. The engine owns the state; this module only does math.
use std::f64::consts::PI;

use crate::constants::{EXPECTED_SCORE_EPSILON, MIN_UNCERTAINTY, Q};
use crate::types::Rating;

/// Down-weighting factor for an opponent's uncertainty.
///
/// An opponent we know little about tells us little about ourselves, so its
/// result counts for less: `g = 1 / sqrt(1 + 3·Q²·RD² / π²)`.
pub fn g(opp_uncertainty: f64) -> f64 {
    1.0 / (1.0 + 3.0 * Q * Q * opp_uncertainty * opp_uncertainty / (PI * PI)).sqrt()
}

/// Modeled probability that self is preferred over the opponent.
pub fn expected_score(self_rating: f64, opp_rating: f64, g: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-g * (self_rating - opp_rating) / 400.0))
}

/// Expected score pulled away from 0 and 1 so that `E·(1 − E)` never vanishes.
fn clamped_expected_score(self_rating: f64, opp_rating: f64, g: f64) -> f64 {
    let e = expected_score(self_rating, opp_rating, g);
    let clamped = e.clamp(EXPECTED_SCORE_EPSILON, 1.0 - EXPECTED_SCORE_EPSILON);
    if clamped != e {
        tracing::trace!(self_rating, opp_rating, expected = e, "clamped degenerate expected score");
    }
    clamped
}

/// Variance of the rating estimate implied by one comparison against this opponent.
///
/// Always finite and positive: the expected score is clamped before use.
pub fn d2(self_rating: f64, opp_rating: f64, opp_uncertainty: f64) -> f64 {
    let g = g(opp_uncertainty);
    let e = clamped_expected_score(self_rating, opp_rating, g);
    1.0 / (Q * Q * g * g * e * (1.0 - e))
}

/// How much the predicted outcome of this matchup could swing given both
/// parties' uncertainty. Used only to pick opponents, never in updates.
///
/// `frac²·(RD₁² + RD₂²)` with `frac = p / (1 + p)²` and `p = 10^(Δ/400)`.
/// `frac` is symmetric in the sign of `Δ`, so it is evaluated with
/// `p = 10^(−|Δ|/400) ≤ 1`, which cannot overflow. For gaps beyond a few
/// thousand points the result still underflows to 0; compare matchups with
/// [`ln_predicted_outcome_variance`] instead.
pub fn predicted_outcome_variance(
    self_rating: f64,
    self_uncertainty: f64,
    opp_rating: f64,
    opp_uncertainty: f64,
) -> f64 {
    let p = 10f64.powf(-(self_rating - opp_rating).abs() / 400.0);
    let frac = p / ((1.0 + p) * (1.0 + p));
    frac * frac * (self_uncertainty * self_uncertainty + opp_uncertainty * opp_uncertainty)
}

/// Natural log of [`predicted_outcome_variance`], computed without leaving
/// log space. Finite for any finite ratings and positive uncertainties, so
/// the most lopsided matchup still orders correctly against the others.
pub fn ln_predicted_outcome_variance(
    self_rating: f64,
    self_uncertainty: f64,
    opp_rating: f64,
    opp_uncertainty: f64,
) -> f64 {
    let ln_p = -(self_rating - opp_rating).abs() * std::f64::consts::LN_10 / 400.0;
    let ln_frac = ln_p - 2.0 * ln_p.exp().ln_1p();
    2.0 * ln_frac
        + (self_uncertainty * self_uncertainty + opp_uncertainty * opp_uncertainty).ln()
}

impl Rating {
    /// Apply one outcome against an opponent.
    ///
    /// `score` is from this item's perspective and must be in `[0, 1]`; the
    /// engine validates it before calling. The new uncertainty never exceeds
    /// the old one and never drops below `MIN_UNCERTAINTY`.
    pub fn update(&mut self, score: f64, opp_rating: f64, opp_uncertainty: f64) {
        debug_assert!((0.0..=1.0).contains(&score), "score {score} outside [0, 1]");

        let g = g(opp_uncertainty);
        let e = clamped_expected_score(self.rating, opp_rating, g);
        let d2 = 1.0 / (Q * Q * g * g * e * (1.0 - e));
        let precision = 1.0 / (self.uncertainty * self.uncertainty) + 1.0 / d2;

        self.rating += Q / precision * g * (score - e);
        // min() absorbs rounding when 1/d2 is negligible next to 1/RD².
        self.uncertainty = (1.0 / precision)
            .sqrt()
            .min(self.uncertainty)
            .max(MIN_UNCERTAINTY);
        self.comparison_count += 1;
    }

    /// This item's expected score against `opponent`.
    pub fn expected_score_against(&self, opponent: &Rating) -> f64 {
        expected_score(self.rating, opponent.rating, g(opponent.uncertainty))
    }

    pub fn predicted_outcome_variance(&self, opponent: &Rating) -> f64 {
        predicted_outcome_variance(
            self.rating,
            self.uncertainty,
            opponent.rating,
            opponent.uncertainty,
        )
    }

    pub fn ln_predicted_outcome_variance(&self, opponent: &Rating) -> f64 {
        ln_predicted_outcome_variance(
            self.rating,
            self.uncertainty,
            opponent.rating,
            opponent.uncertainty,
        )
    }
}
