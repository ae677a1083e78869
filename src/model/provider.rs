//! Opaque model capability and time-bounded prediction

use crate::io::error::{CloudMaskError, InferenceFailureReason, Result, provider_failure};
use crate::model::version::ModelVersion;
use crate::preprocess::normalize::InputTensor;
use ndarray::Array4;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Per-pixel class probabilities `(1, H, W, 5)` over fill, clear, shadow, thin and thick
pub type RawPrediction = Array4<f32>;

/// Error type reported by model providers
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// A loaded segmentation network
///
/// Implementations wrap whatever runtime executes the trained artifact. The
/// pipeline only relies on this single call.
pub trait SegmentationModel: Send + Sync {
    /// Run the network on a `(1, H, W, 8)` tensor
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime fails to execute the network
    fn predict(&self, input: &InputTensor) -> std::result::Result<RawPrediction, ProviderError>;
}

/// Run `model.predict` on a worker thread, giving up after `timeout`
///
/// A timed-out call is abandoned: the worker keeps running until the provider
/// returns, and its result is dropped. A provider that hangs therefore costs
/// one blocked thread per timed-out call, and a provider guarding its session
/// with a lock keeps that lock until it returns.
///
/// # Errors
///
/// Returns `InferenceFailure` if:
/// - The provider reports an error or panics
/// - No result arrives within `timeout`
/// - The worker thread cannot be spawned
pub fn predict_with_timeout(
    model: Arc<dyn SegmentationModel>,
    version: ModelVersion,
    input: Arc<InputTensor>,
    timeout: Duration,
) -> Result<RawPrediction> {
    let (sender, receiver) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name(format!("predict-{version}"))
        .spawn(move || {
            let outcome = model.predict(&input).map_err(|e| e.to_string());
            // Receiver is gone once the caller timed out
            let _ = sender.send(outcome);
        })
        .map_err(|e| provider_failure(version, &e))?;

    match receiver.recv_timeout(timeout) {
        Ok(Ok(prediction)) => Ok(prediction),
        Ok(Err(reason)) => Err(provider_failure(version, &reason)),
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(%version, timeout_ms = %timeout.as_millis(), "prediction timed out");
            Err(CloudMaskError::InferenceFailure {
                version,
                reason: InferenceFailureReason::Timeout(timeout),
            })
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(provider_failure(version, &"model provider panicked"))
        }
    }
}
