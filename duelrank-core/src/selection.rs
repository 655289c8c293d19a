/// Next-comparison policy.
///
/// Two greedy steps, each a single O(n) scan:
///   1. Pick the eligible item with the highest uncertainty.
///   2. Pick the eligible opponent whose matchup has the highest predicted
///      outcome variance against it.
///
/// Both scans walk ids in ascending order and only replace the running best on
/// a strictly greater value, so ties go to the lowest id. An item whose
/// uncertainty is not strictly positive (or NaN) never qualifies. Opponents are
/// scored by log variance, so any eligible opponent qualifies however far its
/// rating is from the subject's.
use std::collections::BTreeSet;

use crate::types::{ItemId, Pair, Rating};

/// The eligible item with the highest uncertainty, or `None` if every item is
/// excluded (or the population is empty).
pub fn best_uncertain_item(items: &[Rating], excluded: &BTreeSet<ItemId>) -> Option<ItemId> {
    let mut best: Option<(ItemId, f64)> = None;
    for (id, item) in items.iter().enumerate() {
        if excluded.contains(&id) {
            continue;
        }
        let max_so_far = best.map_or(0.0, |(_, u)| u);
        if item.uncertainty > max_so_far {
            best = Some((id, item.uncertainty));
        }
    }
    best.map(|(id, _)| id)
}

/// The eligible opponent for `id` maximizing predicted outcome variance.
pub fn best_opponent(items: &[Rating], id: ItemId, excluded: &BTreeSet<ItemId>) -> Option<ItemId> {
    let subject = items.get(id)?;
    let mut best: Option<(ItemId, f64)> = None;
    for (opp_id, opp) in items.iter().enumerate() {
        if opp_id == id || excluded.contains(&opp_id) {
            continue;
        }
        let variance = subject.ln_predicted_outcome_variance(opp);
        let max_so_far = best.map_or(f64::NEG_INFINITY, |(_, v)| v);
        if variance > max_so_far {
            best = Some((opp_id, variance));
        }
    }
    best.map(|(opp_id, _)| opp_id)
}

/// Both steps together. `None` when no complete pair is available.
pub fn select_pair(items: &[Rating], excluded: &BTreeSet<ItemId>) -> Option<Pair> {
    let first = best_uncertain_item(items, excluded)?;
    let second = best_opponent(items, first, excluded)?;
    tracing::trace!(
        first,
        second,
        first_uncertainty = items[first].uncertainty,
        "selected next comparison"
    );
    Some((first, second))
}
