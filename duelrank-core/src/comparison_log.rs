use serde::{Deserialize, Serialize};

use crate::types::{Comparison, ItemId};

/// Append-only record of every comparison the engine has seen.
///
/// Order is informational: incremental ratings are already folded in, but
/// batch refiners read the whole log jointly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonLog {
    entries: Vec<Comparison>,
}

impl ComparisonLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, comparison: Comparison) {
        self.entries.push(comparison);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Comparison] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comparison> {
        self.entries.iter()
    }

    /// Every comparison `id` took part in, in log order.
    pub fn for_item(&self, id: ItemId) -> impl Iterator<Item = &Comparison> + '_ {
        self.entries.iter().filter(move |c| c.a == id || c.b == id)
    }

    /// Outcomes of every comparison between `a` and `b` (in either order),
    /// reported from `a`'s perspective.
    pub fn between(&self, a: ItemId, b: ItemId) -> Vec<f64> {
        self.entries
            .iter()
            .filter_map(|c| match (c.a, c.b) {
                (x, y) if x == a && y == b => Some(c.score),
                (x, y) if x == b && y == a => Some(1.0 - c.score),
                _ => None,
            })
            .collect()
    }
}

impl FromIterator<Comparison> for ComparisonLog {
    fn from_iter<I: IntoIterator<Item = Comparison>>(iter: I) -> Self {
        ComparisonLog {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ComparisonLog {
    type Item = &'a Comparison;
    type IntoIter = std::slice::Iter<'a, Comparison>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(entries: &[(ItemId, ItemId, f64)]) -> ComparisonLog {
        entries.iter().map(|&(a, b, score)| Comparison { a, b, score }).collect()
    }

    #[test]
    fn test_log_preserves_append_order() {
        let log = log_of(&[(0, 1, 1.0), (2, 0, 0.5), (1, 2, 0.0)]);
        assert_eq!(log.len(), 3);
        let pairs: Vec<_> = log.iter().map(|c| (c.a, c.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (2, 0), (1, 2)]);
    }

    #[test]
    fn test_for_item_filters_participants() {
        let log = log_of(&[(0, 1, 1.0), (2, 3, 0.5), (1, 2, 0.0)]);
        assert_eq!(log.for_item(1).count(), 2);
        assert_eq!(log.for_item(3).count(), 1);
        assert_eq!(log.for_item(9).count(), 0);
    }

    #[test]
    fn test_between_reports_from_first_perspective() {
        let log = log_of(&[(0, 1, 1.0), (1, 0, 0.25), (0, 2, 0.5)]);
        assert_eq!(log.between(0, 1), vec![1.0, 0.75]);
        assert_eq!(log.between(1, 0), vec![0.0, 0.25]);
        assert!(log.between(1, 2).is_empty());
    }
}
