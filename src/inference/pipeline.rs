//! End-to-end inference: normalize, predict, correct, remap and render

use crate::inference::correction::{apply_correction, validate_prediction};
use crate::inference::remap::{DisplayMask, remap};
use crate::inference::stats::ClassPercentages;
use crate::io::configuration::DEFAULT_PREDICTION_TIMEOUT;
use crate::io::error::Result;
use crate::io::payload::{HeatmapResponse, InferenceRequest, InferenceResponse, MitigationResponse};
use crate::model::provider::{RawPrediction, predict_with_timeout};
use crate::model::registry::ModelRegistry;
use crate::model::version::ModelVersion;
use crate::preprocess::input::RawInput;
use crate::preprocess::normalize::{InputNormalizer, InputTensor};
use crate::render::{heatmap, mask, preview, shadow};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runtime settings for the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound on a single model prediction
    pub prediction_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prediction_timeout: DEFAULT_PREDICTION_TIMEOUT,
        }
    }
}

/// Everything one prediction produced
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Version that produced it
    pub version: ModelVersion,
    /// Normalized model input
    pub tensor: InputTensor,
    /// Corrected raw class probabilities
    pub raw: RawPrediction,
    /// Display classes per pixel
    pub mask: DisplayMask,
}

impl Prediction {
    /// Coverage per display class
    pub fn percentages(&self) -> ClassPercentages {
        ClassPercentages::from_mask(&self.mask)
    }
}

/// Drives a request from raw payload to rendered response
///
/// The registry is shared; every other stage works on request-local data.
pub struct InferencePipeline {
    registry: Arc<ModelRegistry>,
    normalizer: InputNormalizer,
    config: PipelineConfig,
}

impl InferencePipeline {
    /// Create a pipeline backed by `registry`
    pub const fn new(registry: Arc<ModelRegistry>, config: PipelineConfig) -> Self {
        Self {
            registry,
            normalizer: InputNormalizer::new(),
            config,
        }
    }

    /// Registry this pipeline draws models from
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Settings in effect
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalize `input`, run the version's model and apply its correction
    ///
    /// The correction is applied before any remapping.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input cannot be normalized (`InvalidInput`)
    /// - The model cannot be provided (`ModelUnavailable`)
    /// - The model fails, times out or returns a malformed tensor (`InferenceFailure`)
    pub fn predict(
        &self,
        version: ModelVersion,
        input: &RawInput,
    ) -> Result<(RawPrediction, InputTensor)> {
        let tensor = Arc::new(self.normalizer.normalize(version, input)?);
        let model = self.registry.get_model(version)?;

        let mut raw = predict_with_timeout(
            model,
            version,
            Arc::clone(&tensor),
            self.config.prediction_timeout,
        )?;
        validate_prediction(version, &raw, &tensor)?;
        apply_correction(&mut raw, version.config().correction);

        Ok((raw, Arc::unwrap_or_clone(tensor)))
    }

    /// [`Self::predict`] followed by class remapping
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::predict`]
    pub fn analyze(&self, version: ModelVersion, input: &RawInput) -> Result<Prediction> {
        let (raw, tensor) = self.predict(version, input)?;
        let mask = remap(&raw);
        Ok(Prediction {
            version,
            tensor,
            raw,
            mask,
        })
    }

    /// Segment the uploaded file and build the full inference response
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or any stage fails; no
    /// partial response is produced
    pub fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse> {
        let start = Instant::now();
        let (version, prediction) = self.analyze_request(request)?;

        let percentages = prediction.percentages();
        let response = InferenceResponse {
            mask: mask::encode(&prediction.mask)?,
            percentages,
            has_shadow: percentages.has_shadow(),
            model_used: version.to_string(),
            original_image_url: preview::preview_data_uri(&prediction.tensor)?,
        };

        tracing::info!(
            %version,
            clear = percentages.clear,
            shadow = percentages.shadow,
            thin_cloud = percentages.thin_cloud,
            thick_cloud = percentages.thick_cloud,
            elapsed_ms = %start.elapsed().as_millis(),
            "inference complete"
        );
        Ok(response)
    }

    /// Segment the uploaded file and return its shadow-corrected image
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or any stage fails
    pub fn mitigate(&self, request: &InferenceRequest) -> Result<MitigationResponse> {
        let start = Instant::now();
        let (version, prediction) = self.analyze_request(request)?;
        let mitigated_image = shadow::mitigate_base64(&prediction.tensor, &prediction.mask)?;

        tracing::info!(
            %version,
            elapsed_ms = %start.elapsed().as_millis(),
            "mitigation complete"
        );
        Ok(MitigationResponse { mitigated_image })
    }

    /// Segment the uploaded file and return its solar potential heatmap
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or any stage fails
    pub fn heatmap(&self, request: &InferenceRequest) -> Result<HeatmapResponse> {
        let start = Instant::now();
        let (version, prediction) = self.analyze_request(request)?;
        let heatmap_image = heatmap::heatmap_base64(&prediction.mask)?;

        tracing::info!(
            %version,
            elapsed_ms = %start.elapsed().as_millis(),
            "heatmap complete"
        );
        Ok(HeatmapResponse { heatmap_image })
    }

    fn analyze_request(&self, request: &InferenceRequest) -> Result<(ModelVersion, Prediction)> {
        let file = request.file()?;
        let version = request.version()?;
        let prediction = self.analyze(version, file)?;
        Ok((version, prediction))
    }
}
