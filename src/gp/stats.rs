//! Fitness statistics and their total order.

use super::types::Weakness;
use std::cmp::Ordering;

/// Fitness state of one individual (or one of its slots).
///
/// Ordered by weakness ascending, then cost ascending, then birth
/// generation *descending*: on a full tie the younger individual wins.
/// A NaN weakness of either sign ranks behind every other weakness,
/// including `+inf`, and all NaNs tie; the rest compare with
/// [`f64::total_cmp`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Externally computed weakness. Lower is better.
    pub weakness: Weakness,
    /// Cost of the operations reachable from the selected slot.
    pub cost: usize,
    /// Generation in which the individual was (re)born.
    pub born: usize,
}

impl Stats {
    /// Stats of an individual that has not been evaluated yet.
    pub fn unevaluated(born: usize) -> Self {
        Self {
            weakness: Weakness::INFINITY,
            cost: 0,
            born,
        }
    }

    /// Creates fully specified stats.
    pub fn new(weakness: Weakness, cost: usize, born: usize) -> Self {
        Self {
            weakness,
            cost,
            born,
        }
    }

    /// Number of generations since birth, as seen from generation `gen`.
    pub fn age(&self, gen: usize) -> usize {
        gen.saturating_sub(self.born)
    }
}

impl Ord for Stats {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp alone puts negative NaN (e.g. `inf - inf`) first
        let weakness = match (self.weakness.is_nan(), other.weakness.is_nan()) {
            (false, false) => self.weakness.total_cmp(&other.weakness),
            (lhs, rhs) => lhs.cmp(&rhs),
        };
        weakness
            .then(self.cost.cmp(&other.cost))
            .then(other.born.cmp(&self.born))
    }
}

impl PartialOrd for Stats {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Stats {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Stats {}
