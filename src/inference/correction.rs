//! Post-hoc confidence correction and raw prediction validation

use crate::io::configuration::RAW_CLASS_COUNT;
use crate::io::error::{Result, invalid_output};
use crate::model::provider::RawPrediction;
use crate::model::version::{ConfidenceCorrection, ModelVersion};
use crate::preprocess::normalize::InputTensor;
use ndarray::Axis;

/// Scale the correction's class channel in place
///
/// Other channels are left bit-identical and the result is not renormalized.
/// A correction naming a channel the prediction does not have is ignored.
pub fn apply_correction(prediction: &mut RawPrediction, correction: Option<ConfidenceCorrection>) {
    let Some(ConfidenceCorrection { channel, factor }) = correction else {
        return;
    };

    if channel < prediction.len_of(Axis(3)) {
        prediction
            .index_axis_mut(Axis(3), channel)
            .mapv_inplace(|p| p * factor);
    }
}

/// Check that a provider output lines up with the tensor it was computed from
///
/// # Errors
///
/// Returns `InferenceFailure` if the prediction is not `(1, H, W, 5)` with the
/// input's spatial dimensions
pub fn validate_prediction(
    version: ModelVersion,
    prediction: &RawPrediction,
    input: &InputTensor,
) -> Result<()> {
    let (batch, height, width, classes) = prediction.dim();
    let (_, input_height, input_width, _) = input.dim();

    if batch != 1 {
        return Err(invalid_output(
            version,
            &format!("expected batch size 1, got {batch}"),
        ));
    }
    if classes != RAW_CLASS_COUNT {
        return Err(invalid_output(
            version,
            &format!("expected {RAW_CLASS_COUNT} classes, got {classes}"),
        ));
    }
    if (height, width) != (input_height, input_width) {
        return Err(invalid_output(
            version,
            &format!(
                "spatial size {height}x{width} does not match input {input_height}x{input_width}"
            ),
        ));
    }
    Ok(())
}
