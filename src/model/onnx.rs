//! ONNX Runtime backed model provider

use crate::model::provider::{ProviderError, RawPrediction, SegmentationModel};
use crate::model::registry::ModelLoader;
use crate::model::version::ModelVersion;
use crate::preprocess::normalize::InputTensor;
use ndarray::{ArrayD, IxDyn};
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Segmentation network executed through an ONNX Runtime session
///
/// `Session::run` needs exclusive access, so concurrent predictions on the
/// same model are serialized by the mutex.
pub struct OnnxSegmenter {
    session: Mutex<Session>,
}

impl OnnxSegmenter {
    /// Build a session from an `.onnx` artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot create a session from the file
    pub fn load(path: &Path) -> Result<Self, ort::Error> {
        let session = Session::builder()?.commit_from_file(path)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl SegmentationModel for OnnxSegmenter {
    fn predict(&self, input: &InputTensor) -> Result<RawPrediction, ProviderError> {
        let dims: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let data = input
            .as_slice()
            .ok_or("input tensor is not contiguous in memory")?;
        let tensor = TensorRef::from_array_view((dims, data))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_poisoned| "session lock poisoned")?;
        let outputs = session.run(ort::inputs![tensor])?;

        let (shape, values) = outputs[0].try_extract_tensor::<f32>()?;
        let shape: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        let prediction = ArrayD::from_shape_vec(IxDyn(&shape), values.to_vec())?
            .into_dimensionality()?;
        Ok(prediction)
    }
}

/// Loads every model version from an ONNX export
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxLoader;

impl ModelLoader for OnnxLoader {
    fn load(
        &self,
        _version: ModelVersion,
        path: &Path,
    ) -> Result<Arc<dyn SegmentationModel>, ProviderError> {
        Ok(Arc::new(OnnxSegmenter::load(path)?))
    }
}
