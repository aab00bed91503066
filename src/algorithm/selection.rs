use crate::{algorithm::buckets::PriorityBuckets, spatial::grid::Position};
use ndarray::ArrayView1;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random source for cell picks and color draws
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `0..len`, `None` for an empty range
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Weight-proportional index draw over integer weights
    ///
    /// Zero weights are never returned. Returns `None` when every weight is 0.
    pub fn weighted_choice<'a, I>(&mut self, weights: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a u64>,
        I::IntoIter: Clone,
    {
        let weights = weights.into_iter();
        let total: u128 = weights.clone().map(|&w| u128::from(w)).sum();
        if total == 0 {
            return None;
        }

        let target = self.rng.random_range(0..total);
        let mut cumulative = 0u128;
        for (i, &weight) in weights.enumerate() {
            cumulative += u128::from(weight);
            if target < cumulative {
                return Some(i);
            }
        }
        None
    }

    /// Weighted draw over a cell's candidate weights
    pub fn draw_color(&mut self, weights: ArrayView1<'_, u64>) -> Option<usize> {
        self.weighted_choice(weights.iter())
    }
}

/// Result of looking for the next cell to resolve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A cell taken out of the lowest non-contradiction bucket
    Cell {
        /// Chosen cell
        position: Position,
        /// Viable candidates it had
        candidates: usize,
    },
    /// Only contradiction cells are left
    Stuck {
        /// Cells sitting in bucket 0
        contradictions: usize,
    },
    /// No unresolved cell is left
    Exhausted,
}

/// Take the most constrained resolvable cell, breaking ties uniformly
///
/// Bucket 0 is never drawn from. All buckets from 1 up to and including the
/// palette size are considered, so cells that no propagation ever touched
/// remain selectable.
pub fn select_next_cell(buckets: &mut PriorityBuckets, random: &mut RandomSelector) -> Selection {
    let Some(bucket) = buckets.first_non_empty(1) else {
        let contradictions = buckets.len_of(0);
        return if contradictions > 0 {
            Selection::Stuck { contradictions }
        } else {
            Selection::Exhausted
        };
    };

    let picked = random
        .pick_index(buckets.len_of(bucket))
        .and_then(|slot| buckets.take(bucket, slot));

    match picked {
        Some(position) => Selection::Cell {
            position,
            candidates: bucket,
        },
        None => Selection::Exhausted,
    }
}
