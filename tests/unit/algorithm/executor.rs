//! Tests for session setup, stepping and the radius-caching synthesizer

#[cfg(test)]
mod tests {
    use pixelcollapse::algorithm::executor::{
        GenerationSession, StepOutcome, Synthesizer, validate_dimensions,
    };
    use pixelcollapse::AlgorithmError;
    use pixelcollapse::analysis::exemplar::Exemplar;
    use pixelcollapse::analysis::rules::LearnedModel;
    use pixelcollapse::io::configuration::MAX_GRID_DIMENSION;
    use pixelcollapse::spatial::grid::Pixel;

    const A: [u8; 4] = [255, 0, 0, 255];
    const B: [u8; 4] = [0, 0, 255, 255];

    fn pair_model() -> LearnedModel {
        let exemplar = Exemplar::from_rows(&[vec![A, B]]).expect("valid");
        LearnedModel::learn(&exemplar, 1).expect("learn")
    }

    fn weights(session: &GenerationSession<'_>, x: usize, y: usize) -> Vec<u64> {
        session.weights(x, y).map(|w| w.to_vec()).unwrap_or_default()
    }

    // Tests dimension validation boundaries
    // Verified by allowing zero-sized grids
    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions(1, 1).is_ok());
        assert!(validate_dimensions(MAX_GRID_DIMENSION, 3).is_ok());
        assert!(validate_dimensions(0, 3).is_err());
        assert!(validate_dimensions(3, 0).is_err());
        assert!(validate_dimensions(3, MAX_GRID_DIMENSION + 1).is_err());
    }

    // Tests grids whose candidate weights would not fit in memory are refused
    // before allocation
    // Verified by bounding only the width and height separately
    #[test]
    fn test_session_rejects_oversized_weight_table() {
        let model = pair_model();
        let result = GenerationSession::new(&model, MAX_GRID_DIMENSION, MAX_GRID_DIMENSION, 1);
        assert!(matches!(
            result,
            Err(AlgorithmError::InvalidParameter {
                parameter: "size",
                ..
            })
        ));
        assert!(GenerationSession::new(&model, 64, 64, 1).is_ok());
    }

    // Tests invalid sizes fail before a session exists
    // Verified by skipping validation in the constructor
    #[test]
    fn test_session_rejects_bad_size() {
        let model = pair_model();
        assert!(GenerationSession::new(&model, 0, 5, 1).is_err());
        assert!(GenerationSession::new(&model, 5, MAX_GRID_DIMENSION + 1, 1).is_err());
    }

    // Tests the border seeds only edge-compatible colors
    // Verified by propagating the border with the forward offset
    #[test]
    fn test_border_seeding_weights() {
        let model = pair_model();
        let session = GenerationSession::new(&model, 3, 3, 1).expect("session");

        assert_eq!(weights(&session, 0, 1), vec![2, 0]);
        assert_eq!(weights(&session, 2, 1), vec![0, 2]);
        assert_eq!(weights(&session, 1, 0), vec![2, 2]);
        assert_eq!(weights(&session, 0, 0), vec![3, 0]);
        assert_eq!(weights(&session, 1, 1), vec![1, 1]);

        assert_eq!(session.bucket_of(0, 1), Some(1));
        assert_eq!(session.bucket_of(1, 0), Some(2));
        assert_eq!(session.bucket_of(1, 1), Some(2));
        assert_eq!(session.buckets().total_len(), 9);
        assert_eq!(session.contradictions(), 0);
        assert!(!session.is_finished());
    }

    // Tests interior cells start in the top bucket when the radius is zero
    // Verified by leaving untouched cells out of the buckets
    #[test]
    fn test_interior_cells_start_in_top_bucket() {
        let exemplar = Exemplar::from_rows(&[vec![A, B]]).expect("valid");
        let model = LearnedModel::learn(&exemplar, 0).expect("learn");
        let session = GenerationSession::new(&model, 4, 4, 1).expect("session");

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(session.bucket_of(x, y), Some(2));
            }
        }
    }

    // Tests a step fixes exactly one cell and takes it out of the buckets
    // Verified by propagating before fixing the output cell
    #[test]
    fn test_step_resolves_one_cell() {
        let model = pair_model();
        let mut session = GenerationSession::new(&model, 3, 1, 11).expect("session");

        let outcome = session.step().expect("step");
        let StepOutcome::Resolved { x, y, color } = outcome else {
            unreachable!("expected a resolved cell, got {outcome:?}");
        };

        assert_eq!(session.output().get(x as i64, y as i64), Pixel::Color(color));
        assert_eq!(session.bucket_of(x, y), None);
        let stats = session.stats();
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.unresolved, 2);
        assert_eq!(stats.steps, 1);
    }

    // Tests the most constrained edge cell is resolved first
    // Verified by selecting from the highest bucket
    #[test]
    fn test_first_step_takes_constrained_cell() {
        let model = pair_model();
        let mut session = GenerationSession::new(&model, 3, 1, 4).expect("session");

        match session.step().expect("step") {
            StepOutcome::Resolved { x: 0, color, .. } => assert_eq!(color, 0),
            StepOutcome::Resolved { x: 2, color, .. } => assert_eq!(color, 1),
            other => unreachable!("unexpected first step {other:?}"),
        }
    }

    // Tests a terminal outcome repeats on later calls
    // Verified by clearing the finished state after returning it
    #[test]
    fn test_terminal_outcome_is_sticky() {
        let model = pair_model();
        let mut session = GenerationSession::new(&model, 1, 1, 2).expect("session");

        assert_eq!(
            session.step().expect("step"),
            StepOutcome::Stuck { contradictions: 1 }
        );
        assert_eq!(
            session.step().expect("step"),
            StepOutcome::Stuck { contradictions: 1 }
        );
        assert_eq!(
            session.finished(),
            Some(StepOutcome::Stuck { contradictions: 1 })
        );
        assert_eq!(session.stats().steps, 1);
    }

    // Tests run_steps stops at the limit or at a terminal outcome
    // Verified by ignoring the terminal check in the loop
    #[test]
    fn test_run_steps_limit() {
        let exemplar = Exemplar::from_rows(&[vec![A]]).expect("valid");
        let model = LearnedModel::learn(&exemplar, 1).expect("learn");
        let mut session = GenerationSession::new(&model, 2, 2, 3).expect("session");

        let last = session.run_steps(2).expect("steps");
        assert!(matches!(last, Some(StepOutcome::Resolved { .. })));
        assert_eq!(session.stats().resolved, 2);

        let last = session.run_steps(10).expect("steps");
        assert_eq!(last, Some(StepOutcome::Exhausted));
        assert_eq!(session.stats().resolved, 4);
    }

    // Tests the synthesizer relearns only when the radius changes
    // Verified by relearning on every prepare call
    #[test]
    fn test_synthesizer_caches_model() {
        let exemplar = Exemplar::from_rows(&[vec![A, B], vec![B, A]]).expect("valid");
        let mut synthesizer = Synthesizer::new(exemplar);

        assert!(synthesizer.model().is_none());
        assert!(synthesizer.session(4, 4, 1).is_err());

        assert!(synthesizer.prepare(1).expect("learn"));
        assert!(!synthesizer.prepare(1).expect("cached"));
        assert_eq!(synthesizer.model().map(LearnedModel::radius), Some(1));

        assert!(synthesizer.prepare(2).expect("relearn"));
        assert_eq!(synthesizer.model().map(LearnedModel::radius), Some(2));

        let session = synthesizer.session(4, 4, 1).expect("session");
        assert_eq!(session.cell_count(), 16);
        assert_eq!(session.model().radius(), 2);
    }

    // Tests visualization records each resolved cell in order
    // Verified by recording before the color draw
    #[test]
    fn test_visualization_records_steps() {
        let exemplar = Exemplar::from_rows(&[vec![A]]).expect("valid");
        let model = LearnedModel::learn(&exemplar, 0).expect("learn");
        let mut session = GenerationSession::new(&model, 3, 2, 8).expect("session");
        session.enable_visualization();

        session.run().expect("run");

        let placements = session
            .visualization
            .as_ref()
            .map(|viz| viz.placements().to_vec())
            .unwrap_or_default();
        assert_eq!(placements.len(), 6);
        for (i, placement) in placements.iter().enumerate() {
            assert_eq!(placement.iteration, i + 1);
            assert_eq!(placement.color, 0);
        }
    }
}
