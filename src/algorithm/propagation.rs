use crate::{
    algorithm::buckets::PriorityBuckets,
    analysis::rules::RuleIndex,
    spatial::grid::{CandidateGrid, Neighbor, OutputGrid, Position, checked_position},
    spatial::neighborhood::NeighborhoodOffsets,
};
use ndarray::ArrayViewMut1;

/// Summary of one propagation pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Unset neighbors whose weights were revisited
    pub updated: usize,
    /// Neighbors that lost their last viable color in this pass
    pub new_contradictions: usize,
}

/// Fold summed rule support into a cell's weights
///
/// A color keeps its place only if it is still viable and the rule set
/// supports it here, in which case the support is added to its weight.
/// Everything else drops to 0 and never comes back.
pub fn apply_rule_support(weights: &mut ArrayViewMut1<'_, u64>, support: &[u64]) {
    for (color, weight) in weights.iter_mut().enumerate() {
        let sum = support.get(color).copied().unwrap_or(0);
        if sum > 0 && *weight > 0 {
            *weight = weight.saturating_add(sum);
        } else {
            *weight = 0;
        }
    }
}

/// Update every unset neighbor of a freshly fixed position
///
/// `origin` may lie on the border ring outside the grid, which is how the
/// `Outside` sentinel seeds the initial constraints. For each offset the
/// rules stating "c1 can be at -offset from `fixed`" are looked up; if none
/// exist the neighbor is left as is. Each touched neighbor is relocated to
/// the bucket matching its new viable count.
pub fn propagate_fixed_cell(
    output: &OutputGrid,
    candidates: &mut CandidateGrid,
    buckets: &mut PriorityBuckets,
    offsets: &NeighborhoodOffsets,
    index: &RuleIndex,
    origin: (i64, i64),
    fixed: Neighbor,
) -> PropagationReport {
    let mut report = PropagationReport::default();

    for &offset in offsets {
        let (tx, ty) = offset.apply(origin.0, origin.1);
        let Some(target) = checked_position(tx, ty, output.width(), output.height()) else {
            continue;
        };
        if !output.get(tx, ty).is_unset() {
            continue;
        }

        let before = candidates.viable_count(target);
        buckets.remove(target);

        if let Some(support) = index.support(fixed, offset.reversed()) {
            if let Some(mut weights) = candidates.weights_mut(target) {
                apply_rule_support(&mut weights, support);
            }
        }

        let after = relocate(candidates, buckets, target);
        report.updated += 1;
        if before > 0 && after == 0 {
            report.new_contradictions += 1;
        }
    }

    report
}

fn relocate(candidates: &CandidateGrid, buckets: &mut PriorityBuckets, target: Position) -> usize {
    let count = candidates.viable_count(target);
    buckets.insert(target, count);
    count
}
