//! Tests for progress tracking labels across files

#[cfg(test)]
mod tests {
    use pixelcollapse::GenerationStats;
    use pixelcollapse::io::progress::ProgressManager;
    use std::path::Path;

    // Tests labels pad the resolved count to the total's width
    // Verified by removing the width padding
    #[test]
    fn test_label_tracks_cells() {
        let mut pm = ProgressManager::new();
        pm.initialize(1);
        pm.start_file(0, Path::new("dir/a.png"), 1024);

        assert_eq!(pm.label(0).as_deref(), Some("   0/1024"));

        pm.update_cells(0, 64);
        assert_eq!(pm.label(0).as_deref(), Some("  64/1024"));
        pm.finish();
    }

    // Tests completed files report their contradictions
    // Verified by ignoring contradictions from the stats
    #[test]
    fn test_complete_file_reports_stuck_cells() {
        let mut pm = ProgressManager::new();
        pm.initialize(2);
        pm.start_file(1, Path::new("b.png"), 16);

        let stats = GenerationStats {
            resolved: 13,
            contradictions: 3,
            unresolved: 3,
            steps: 14,
        };
        pm.complete_file(1, &stats);

        assert_eq!(pm.label(1).as_deref(), Some("13/16 (3 stuck)"));
        assert_eq!(pm.label(0).as_deref(), Some("0/0"));
        assert_eq!(pm.label(5), None);
        pm.finish();
    }

    // Tests large batches beyond the visible bar count are tracked
    // Verified by dropping states for files without a bar
    #[test]
    fn test_many_files_keep_state() {
        let mut pm = ProgressManager::default();
        pm.initialize(20);
        for index in 0..20 {
            pm.start_file(index, Path::new("tile.png"), 4);
            pm.update_cells(index, 4);
        }
        assert_eq!(pm.label(19).as_deref(), Some("4/4"));
        pm.finish();
    }
}
