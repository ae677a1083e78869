//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Processing steps a single file goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the payload from disk
    Reading,
    /// Normalizing and running the model
    Inferring,
    /// Rendering and writing outputs
    Writing,
    /// All outputs written
    Done,
}

impl Stage {
    /// Number of steps before a file is done
    pub const STEPS: u64 = 3;

    /// Steps completed when this stage is reached
    pub const fn position(self) -> u64 {
        match self {
            Self::Reading => 0,
            Self::Inferring => 1,
            Self::Writing => 2,
            Self::Done => 3,
        }
    }

    /// Short label shown next to the bar
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reading => "reading",
            Self::Inferring => "inferring",
            Self::Writing => "writing",
            Self::Done => "done",
        }
    }
}

/// Coordinates progress display for batch operations
///
/// Shows one bar per recent file and adds a batch bar once the file count
/// exceeds the individual bar limit
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    /// Stores (`filename`, `stage`) per file index
    file_states: Vec<(String, Stage)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg:>9} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_states: Vec::new(),
        }
    }

    /// Create progress bars for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(Stage::STEPS);
            bar.set_style(STAGE_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Register a file as started
    pub fn start_file(&mut self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(index + 1, (String::new(), Stage::Reading));
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = (display_name, Stage::Reading);
        }
        self.update_bars();
    }

    /// Move a file to a new stage
    pub fn set_stage(&mut self, index: usize, stage: Stage) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.1 = stage;
        }
        self.update_bars();
    }

    /// Mark a file as finished and advance the batch bar
    pub fn complete_file(&mut self, index: usize, elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        tracing::debug!(index, elapsed_ms = %elapsed.as_millis(), "file complete");
        self.set_stage(index, Stage::Done);
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Number of per-file bars in use
    pub const fn file_bar_count(&self) -> usize {
        self.file_bars.len()
    }

    /// Whether the aggregate batch bar is shown
    pub const fn has_batch_bar(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Stage of a started file
    pub fn stage(&self, index: usize) -> Option<Stage> {
        self.file_states.get(index).map(|(_, stage)| *stage)
    }

    // Shows the most recently started files on the available bars
    fn update_bars(&self) {
        let active: Vec<&(String, Stage)> = self
            .file_states
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, (name, stage)) in visible.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_position(stage.position());
                bar.set_message(stage.label());
                bar.set_prefix(name.clone());
            }
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_position(0);
            bar.set_message("");
            bar.set_prefix("");
        }
    }
}
