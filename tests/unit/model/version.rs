//! Tests for version parsing and the static metadata table

#[cfg(test)]
mod tests {
    use cloudmask::CloudMaskError;
    use cloudmask::io::configuration::{INPUT_CHANNELS, INPUT_SIZE, MODEL_PATH_V2_ENV};
    use cloudmask::model::ModelVersion;
    use cloudmask::model::version::{ConfidenceCorrection, VERSION_TABLE};

    // Tests wire names round-trip through Display and FromStr
    // Verified by mislabelling V3 as "v2"
    #[test]
    fn test_version_names() {
        for version in ModelVersion::ALL {
            let parsed: ModelVersion = version.to_string().parse().expect("name must parse");
            assert_eq!(parsed, version);
        }
        assert_eq!(" V1 ".parse::<ModelVersion>().ok(), Some(ModelVersion::V1));
    }

    // Tests unknown names carry the rejected value
    // Verified by mapping unknown names to V2
    #[test]
    fn test_unknown_version() {
        let result = "v2.1".parse::<ModelVersion>();
        assert!(matches!(
            result,
            Err(CloudMaskError::UnsupportedVersion { ref value }) if value == "v2.1"
        ));
    }

    // Tests every table entry describes its own version in table order
    // Verified by swapping the V2 and V3 rows
    #[test]
    fn test_table_order() {
        for (entry, version) in VERSION_TABLE.iter().zip(ModelVersion::ALL) {
            assert_eq!(entry.version, version);
            assert_eq!(version.config().version, version);
        }
    }

    // Tests all versions share the 256x256x8 input shape
    // Verified by changing the V1 band count
    #[test]
    fn test_input_shape() {
        for version in ModelVersion::ALL {
            let config = version.config();
            assert_eq!(config.input_shape, [1, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS]);
            assert_eq!(config.channels(), 8);
        }
    }

    // Tests only the later generations penalize thin cloud confidence
    // Verified by enabling the correction on V1
    #[test]
    fn test_corrections() {
        let thin_penalty = Some(ConfidenceCorrection {
            channel: 3,
            factor: 0.65,
        });
        assert_eq!(ModelVersion::V1.config().correction, None);
        assert_eq!(ModelVersion::V2.config().correction, thin_penalty);
        assert_eq!(ModelVersion::V3.config().correction, thin_penalty);
    }

    // Tests V2 weights are clipped then normalized to a mean of one
    // Verified by skipping the clip step
    #[test]
    fn test_v2_class_weights() {
        let weights = ModelVersion::V2.config().class_weights;
        let mean = weights.iter().sum::<f32>() / weights.len() as f32;
        assert!((mean - 1.0).abs() < 1e-5);

        // Shadow weight is clipped from 15 to 10 before normalization
        let ratio = weights[2] / weights[1];
        assert!((ratio - 10.0 / 0.430).abs() < 1e-3);
    }

    // Tests V3 ignores the fill class entirely
    // Verified by giving fill a nonzero weight
    #[test]
    fn test_v3_class_weights() {
        assert_eq!(ModelVersion::V3.config().class_weights, [0.0, 0.5, 3.0, 3.0, 1.0]);
    }

    // Tests artifact metadata points at the documented override variables
    // Verified by reusing the V1 variable for V2
    #[test]
    fn test_artifact_metadata() {
        assert_eq!(ModelVersion::V2.config().artifact_env, MODEL_PATH_V2_ENV);
        assert_eq!(ModelVersion::V1.config().default_artifact, "model.onnx");
    }
}
