//! Command-line interface for batch segmentation of image and array files

use crate::inference::pipeline::{InferencePipeline, PipelineConfig};
use crate::io::configuration::{
    DEFAULT_MODEL_TYPE, DEFAULT_PREDICTION_TIMEOUT, HEATMAP_SUFFIX, MASK_SUFFIX, MITIGATED_SUFFIX,
    RESULT_SUFFIX, SUPPORTED_EXTENSIONS,
};
use crate::io::error::{CloudMaskError, ErrorStatus, Result};
use crate::io::payload::InferenceRequest;
use crate::io::progress::{ProgressManager, Stage};
use crate::model::default_loader;
use crate::model::registry::{ArtifactPaths, ModelRegistry};
use crate::model::version::ModelVersion;
use crate::preprocess::input::RawInput;
use crate::render::encode::from_base64;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Operation applied to every input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Write the display mask and the JSON result
    Predict,
    /// Write the shadow-corrected RGB image
    Mitigate,
    /// Write the solar potential heatmap
    Heatmap,
}

impl Mode {
    /// Output file suffixes this mode produces
    pub const fn suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Predict => &[MASK_SUFFIX, RESULT_SUFFIX],
            Self::Mitigate => &[MITIGATED_SUFFIX],
            Self::Heatmap => &[HEATMAP_SUFFIX],
        }
    }
}

#[derive(Parser)]
#[command(name = "cloudmask")]
#[command(
    author,
    version,
    about = "Segment clouds and shadows in satellite imagery"
)]
/// Command-line arguments for the segmentation tool
pub struct Cli {
    /// Operation to run
    #[arg(value_enum, value_name = "MODE")]
    pub mode: Mode,

    /// Input file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Model generation to use (v1, v2 or v3)
    #[arg(short, long, default_value = DEFAULT_MODEL_TYPE)]
    pub model: String,

    /// Directory holding the default model artifacts
    #[arg(short = 'd', long)]
    pub model_dir: Option<PathBuf>,

    /// Seconds to wait for a single prediction
    #[arg(short, long, default_value_t = DEFAULT_PREDICTION_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Process files even if outputs exist
    #[arg(short, long)]
    pub no_skip: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Pipeline settings derived from the flags
    pub const fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            prediction_timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Artifact locations from the environment and `--model-dir`
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let paths = ArtifactPaths::from_env();
        match self.model_dir {
            Some(ref dir) => paths.with_model_dir(dir),
            None => paths,
        }
    }
}

/// Counts reported after a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files whose outputs were written
    pub processed: usize,
    /// Files skipped because outputs already existed or they are outputs themselves
    pub skipped: usize,
    /// Files rejected as invalid input
    pub rejected: usize,
}

/// Orchestrates batch processing with progress tracking
///
/// Invalid inputs are logged and skipped; any other failure aborts the run.
pub struct FileProcessor {
    cli: Cli,
    pipeline: InferencePipeline,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a file processor backed by the compiled-in model runtime
    pub fn new(cli: Cli) -> Self {
        let registry = ModelRegistry::new(default_loader(), cli.artifact_paths());
        let pipeline = InferencePipeline::new(Arc::new(registry), cli.pipeline_config());
        Self::with_pipeline(cli, pipeline)
    }

    /// Create a file processor around an existing pipeline
    pub fn with_pipeline(cli: Cli, pipeline: InferencePipeline) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            pipeline,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model type is unknown
    /// - The target is not a supported file or a directory
    /// - A file fails for any reason other than invalid input
    pub fn process(&mut self) -> Result<BatchSummary> {
        let version: ModelVersion = self.cli.model.parse()?;
        let (candidates, generated) = self.collect_files()?;

        let mut summary = BatchSummary {
            skipped: generated,
            ..BatchSummary::default()
        };
        let files: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| {
                let process = self.should_process_file(path);
                if !process {
                    summary.skipped += 1;
                }
                process
            })
            .collect();

        if files.is_empty() {
            return Ok(summary);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            match self.process_file(version, file, index) {
                Ok(()) => summary.processed += 1,
                Err(e) if e.status() == ErrorStatus::BadRequest => {
                    tracing::warn!(file = %file.display(), error = %e, "skipping invalid input");
                    summary.rejected += 1;
                }
                Err(e) => {
                    if let Some(ref pm) = self.progress_manager {
                        pm.finish();
                    }
                    return Err(e);
                }
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        tracing::info!(
            processed = summary.processed,
            skipped = summary.skipped,
            rejected = summary.rejected,
            "batch complete"
        );
        Ok(summary)
    }

    /// Whether `path` has an extension this tool reads
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
    }

    /// Output location for `input_path` with `suffix` appended to its stem
    pub fn output_path(input_path: &Path, suffix: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{suffix}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }

    // Returns the inputs to consider and how many earlier outputs were passed over
    fn collect_files(&self) -> Result<(Vec<PathBuf>, usize)> {
        let target = &self.cli.target;
        if target.is_file() {
            if Self::is_supported(target) {
                Ok((vec![target.clone()], 0))
            } else {
                Err(target_error(target, "Target file has an unsupported extension"))
            }
        } else if target.is_dir() {
            let entries = std::fs::read_dir(target).map_err(|e| CloudMaskError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            })?;

            let mut files = Vec::new();
            let mut generated = 0;
            for entry in entries {
                let path = entry
                    .map_err(|e| CloudMaskError::FileSystem {
                        path: target.clone(),
                        operation: "read directory entry",
                        source: e,
                    })?
                    .path();
                if !path.is_file() || !Self::is_supported(&path) {
                    continue;
                }
                if is_generated_output(&path) {
                    tracing::debug!(file = %path.display(), "skipping (generated output)");
                    generated += 1;
                } else {
                    files.push(path);
                }
            }
            files.sort();
            Ok((files, generated))
        } else {
            Err(target_error(target, "Target must be a file or directory"))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let outputs_exist = self
            .cli
            .mode
            .suffixes()
            .iter()
            .all(|suffix| Self::output_path(input_path, suffix).exists());
        if outputs_exist {
            tracing::info!(file = %input_path.display(), "skipping (output exists)");
        }
        !outputs_exist
    }

    fn process_file(&mut self, version: ModelVersion, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let request =
            InferenceRequest::new(RawInput::from_path(input_path)?).with_model_type(version.as_str());
        self.set_stage(index, Stage::Inferring);

        match self.cli.mode {
            Mode::Predict => {
                let response = self.pipeline.infer(&request)?;
                self.set_stage(index, Stage::Writing);

                let mask_png = from_base64(&response.mask)?;
                write_output(&Self::output_path(input_path, MASK_SUFFIX), &mask_png)?;

                let result_path = Self::output_path(input_path, RESULT_SUFFIX);
                let json = serde_json::to_vec_pretty(&response).map_err(|e| {
                    CloudMaskError::FileSystem {
                        path: result_path.clone(),
                        operation: "serialize result",
                        source: e.into(),
                    }
                })?;
                write_output(&result_path, &json)?;
            }
            Mode::Mitigate => {
                let response = self.pipeline.mitigate(&request)?;
                self.set_stage(index, Stage::Writing);
                let png = from_base64(&response.mitigated_image)?;
                write_output(&Self::output_path(input_path, MITIGATED_SUFFIX), &png)?;
            }
            Mode::Heatmap => {
                let response = self.pipeline.heatmap(&request)?;
                self.set_stage(index, Stage::Writing);
                let png = from_base64(&response.heatmap_image)?;
                write_output(&Self::output_path(input_path, HEATMAP_SUFFIX), &png)?;
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(())
    }

    fn set_stage(&mut self, index: usize, stage: Stage) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.set_stage(index, stage);
        }
    }
}

// Outputs of an earlier run sit next to their inputs and share an extension
fn is_generated_output(path: &Path) -> bool {
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_ascii_lowercase();
    [MASK_SUFFIX, MITIGATED_SUFFIX, HEATMAP_SUFFIX]
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

fn target_error(target: &Path, message: &str) -> CloudMaskError {
    CloudMaskError::FileSystem {
        path: target.to_path_buf(),
        operation: "resolve target",
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, message.to_string()),
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| CloudMaskError::FileSystem {
        path: path.to_path_buf(),
        operation: "write output",
        source: e,
    })
}
