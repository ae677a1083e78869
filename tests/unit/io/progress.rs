//! Tests for stage tracking and batch bar selection in the progress display

#[cfg(test)]
mod tests {
    use cloudmask::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
    use cloudmask::io::progress::{ProgressManager, Stage};
    use std::path::Path;
    use std::time::Duration;

    // Tests stage positions advance monotonically to the step count
    // Verified by swapping inferring and writing positions
    #[test]
    fn test_stage_positions() {
        let stages = [Stage::Reading, Stage::Inferring, Stage::Writing, Stage::Done];
        assert!(stages.windows(2).all(|w| w[0].position() < w[1].position()));
        assert_eq!(Stage::Done.position(), Stage::STEPS);
    }

    // Tests small batches get one bar per file and no batch bar
    // Verified by always creating the batch bar
    #[test]
    fn test_small_batch_layout() {
        let mut manager = ProgressManager::new();
        manager.initialize(3);

        assert_eq!(manager.file_bar_count(), 3);
        assert!(!manager.has_batch_bar());
    }

    // Tests large batches cap the file bars and add a batch bar
    // Verified by removing the cap on individual bars
    #[test]
    fn test_large_batch_layout() {
        let mut manager = ProgressManager::new();
        manager.initialize(MAX_INDIVIDUAL_PROGRESS_BARS + 10);

        assert_eq!(manager.file_bar_count(), MAX_INDIVIDUAL_PROGRESS_BARS);
        assert!(manager.has_batch_bar());
    }

    // Tests files move through their stages and finish as done
    // Verified by not recording stage updates
    #[test]
    fn test_file_stage_tracking() {
        let mut manager = ProgressManager::new();
        manager.initialize(2);

        manager.start_file(0, Path::new("scene_a.png"));
        assert_eq!(manager.stage(0), Some(Stage::Reading));
        assert_eq!(manager.stage(1), None);

        manager.set_stage(0, Stage::Inferring);
        assert_eq!(manager.stage(0), Some(Stage::Inferring));

        manager.start_file(1, Path::new("scene_b.npy"));
        manager.complete_file(0, Duration::from_millis(5));
        assert_eq!(manager.stage(0), Some(Stage::Done));
        assert_eq!(manager.stage(1), Some(Stage::Reading));

        manager.finish();
    }
}
