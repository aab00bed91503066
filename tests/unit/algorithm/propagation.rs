//! Tests for weight updates and bucket relocation after fixing a cell

#[cfg(test)]
mod tests {
    use ndarray::Array1;
    use pixelcollapse::algorithm::buckets::PriorityBuckets;
    use pixelcollapse::algorithm::propagation::{apply_rule_support, propagate_fixed_cell};
    use pixelcollapse::analysis::exemplar::Exemplar;
    use pixelcollapse::analysis::rules::LearnedModel;
    use pixelcollapse::spatial::grid::{CandidateGrid, Neighbor, OutputGrid, Pixel};

    const A: [u8; 4] = [255, 0, 0, 255];
    const B: [u8; 4] = [0, 0, 255, 255];

    fn fresh_state(
        width: usize,
        height: usize,
        palette_len: usize,
    ) -> (OutputGrid, CandidateGrid, PriorityBuckets) {
        let output = OutputGrid::new(width, height);
        let candidates = CandidateGrid::new(width, height, palette_len);
        let mut buckets = PriorityBuckets::new(width, height, palette_len);
        for y in 0..height {
            for x in 0..width {
                buckets.insert((x, y), palette_len);
            }
        }
        (output, candidates, buckets)
    }

    // Tests supported colors are reinforced and unsupported ones eliminated
    // Verified by resetting supported weights instead of adding
    #[test]
    fn test_apply_rule_support() {
        let mut weights = Array1::from(vec![1u64, 3, 0, 4]);
        apply_rule_support(&mut weights.view_mut(), &[2, 0, 5, 1]);
        assert_eq!(weights.to_vec(), vec![3, 0, 0, 5]);
    }

    // Tests an eliminated color never comes back
    // Verified by adding support to zero weights
    #[test]
    fn test_apply_rule_support_is_monotone() {
        let mut weights = Array1::from(vec![2u64, 2]);
        apply_rule_support(&mut weights.view_mut(), &[0, 1]);
        apply_rule_support(&mut weights.view_mut(), &[9, 9]);
        assert_eq!(weights.to_vec(), vec![0, 12]);
    }

    // Tests a short support vector treats missing colors as unsupported
    // Verified by skipping colors past the end of the support slice
    #[test]
    fn test_apply_rule_support_short_vector() {
        let mut weights = Array1::from(vec![1u64, 1, 1]);
        apply_rule_support(&mut weights.view_mut(), &[1]);
        assert_eq!(weights.to_vec(), vec![2, 0, 0]);
    }

    // Tests fixing a left border cell leaves only colors seen at the left edge
    // Verified by looking up the offset instead of its reverse
    #[test]
    fn test_propagate_from_border() {
        let exemplar = Exemplar::from_rows(&[vec![A, B]]).expect("valid");
        let model = LearnedModel::learn(&exemplar, 1).expect("learn");
        let (output, mut candidates, mut buckets) = fresh_state(3, 1, 2);

        let report = propagate_fixed_cell(
            &output,
            &mut candidates,
            &mut buckets,
            model.offsets(),
            model.index(),
            (-1, 0),
            Neighbor::Outside,
        );

        assert_eq!(report.updated, 1);
        assert_eq!(report.new_contradictions, 0);
        assert_eq!(candidates.weights((0, 0)).map(|w| w.to_vec()), Some(vec![2, 0]));
        assert_eq!(buckets.bucket_of((0, 0)), Some(1));
        assert_eq!(buckets.bucket_of((1, 0)), Some(2));
    }

    // Tests a color propagates its right-hand neighbor statistics
    // Verified by matching rules on c1 instead of c2
    #[test]
    fn test_propagate_from_color() {
        let exemplar = Exemplar::from_rows(&[vec![A, B]]).expect("valid");
        let model = LearnedModel::learn(&exemplar, 1).expect("learn");
        let (mut output, mut candidates, mut buckets) = fresh_state(3, 1, 2);

        output.set((0, 0), Pixel::Color(0));
        buckets.remove((0, 0));
        propagate_fixed_cell(
            &output,
            &mut candidates,
            &mut buckets,
            model.offsets(),
            model.index(),
            (0, 0),
            Neighbor::Color(0),
        );

        // Only B was ever seen to the right of A
        assert_eq!(candidates.weights((1, 0)).map(|w| w.to_vec()), Some(vec![0, 2]));
        assert_eq!(buckets.bucket_of((1, 0)), Some(1));
        // The fixed cell itself is not touched or re-bucketed
        assert_eq!(buckets.bucket_of((0, 0)), None);
        assert_eq!(candidates.weights((0, 0)).map(|w| w.to_vec()), Some(vec![1, 1]));
    }

    // Tests missing rules leave the neighbor untouched but still bucketed
    // Verified by zeroing weights when no rule matches
    #[test]
    fn test_propagate_without_matching_rules() {
        let exemplar = Exemplar::from_rows(&[vec![A, B]]).expect("valid");
        let model = LearnedModel::learn(&exemplar, 1).expect("learn");
        let (mut output, mut candidates, mut buckets) = fresh_state(3, 1, 2);

        // Nothing was ever seen to the right of B except the edge
        output.set((1, 0), Pixel::Color(1));
        buckets.remove((1, 0));
        propagate_fixed_cell(
            &output,
            &mut candidates,
            &mut buckets,
            model.offsets(),
            model.index(),
            (1, 0),
            Neighbor::Color(1),
        );

        assert_eq!(candidates.weights((2, 0)).map(|w| w.to_vec()), Some(vec![1, 1]));
        assert_eq!(buckets.bucket_of((2, 0)), Some(2));
        assert_eq!(candidates.weights((0, 0)).map(|w| w.to_vec()), Some(vec![2, 0]));
    }

    // Tests a cell squeezed between incompatible edges lands in bucket 0
    // Verified by skipping re-insertion for zero counts
    #[test]
    fn test_propagate_reports_contradiction() {
        let exemplar = Exemplar::from_rows(&[vec![A, B]]).expect("valid");
        let model = LearnedModel::learn(&exemplar, 1).expect("learn");
        let (output, mut candidates, mut buckets) = fresh_state(1, 1, 2);

        let left = propagate_fixed_cell(
            &output,
            &mut candidates,
            &mut buckets,
            model.offsets(),
            model.index(),
            (-1, 0),
            Neighbor::Outside,
        );
        let right = propagate_fixed_cell(
            &output,
            &mut candidates,
            &mut buckets,
            model.offsets(),
            model.index(),
            (1, 0),
            Neighbor::Outside,
        );

        assert_eq!(left.new_contradictions, 0);
        assert_eq!(right.new_contradictions, 1);
        assert_eq!(candidates.viable_count((0, 0)), 0);
        assert_eq!(buckets.bucket_of((0, 0)), Some(0));
    }
}
