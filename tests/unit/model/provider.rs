//! Tests for time-bounded prediction on a worker thread

#[cfg(test)]
mod tests {
    use crate::support::{FailingModel, PanickingModel, ScriptedModel, SlowModel};
    use cloudmask::CloudMaskError;
    use cloudmask::io::error::InferenceFailureReason;
    use cloudmask::model::ModelVersion;
    use cloudmask::model::provider::predict_with_timeout;
    use ndarray::Array4;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn small_input() -> Arc<Array4<f32>> {
        Arc::new(Array4::zeros((1, 4, 6, 8)))
    }

    // Tests a prompt provider's output is returned unchanged
    // Verified by transposing the output
    #[test]
    fn test_prediction_returned() {
        let model = Arc::new(ScriptedModel::uniform(4));
        let prediction =
            predict_with_timeout(model, ModelVersion::V1, small_input(), Duration::from_secs(5))
                .expect("Prediction failed");

        assert_eq!(prediction.dim(), (1, 4, 6, 5));
        assert!(prediction[[0, 2, 3, 4]] > prediction[[0, 2, 3, 0]]);
    }

    // Tests a slow provider fails with a timeout instead of blocking
    // Verified by waiting on the receiver without a deadline
    #[test]
    fn test_timeout() {
        let model = Arc::new(SlowModel(Duration::from_secs(2)));
        let start = Instant::now();
        let result =
            predict_with_timeout(model, ModelVersion::V2, small_input(), Duration::from_millis(50));

        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(matches!(
            result,
            Err(CloudMaskError::InferenceFailure {
                version: ModelVersion::V2,
                reason: InferenceFailureReason::Timeout(_)
            })
        ));
    }

    // Tests provider errors surface as inference failures with the provider message
    // Verified by discarding the provider message
    #[test]
    fn test_provider_error() {
        let result = predict_with_timeout(
            Arc::new(FailingModel),
            ModelVersion::V3,
            small_input(),
            Duration::from_secs(5),
        );

        match result {
            Err(CloudMaskError::InferenceFailure {
                reason: InferenceFailureReason::Provider(message),
                ..
            }) => assert!(message.contains("runtime exploded")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    // Tests a panicking provider does not take the caller down
    // Verified by propagating the worker panic
    #[test]
    fn test_provider_panic() {
        let result = predict_with_timeout(
            Arc::new(PanickingModel),
            ModelVersion::V1,
            small_input(),
            Duration::from_secs(5),
        );

        assert!(matches!(
            result,
            Err(CloudMaskError::InferenceFailure {
                reason: InferenceFailureReason::Provider(_),
                ..
            })
        ));
    }
}
