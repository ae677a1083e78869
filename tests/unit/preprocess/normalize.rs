//! Tests for image and array normalization into model input tensors

#[cfg(test)]
mod tests {
    use crate::support::{gradient_png, npy_bytes, npy_bytes_f64};
    use cloudmask::CloudMaskError;
    use cloudmask::io::error::InvalidInputKind;
    use cloudmask::model::ModelVersion;
    use cloudmask::preprocess::{InputNormalizer, RawInput};
    use ndarray::{Array4, ArrayD, IxDyn, s};

    fn normalize(input: &RawInput) -> Result<Array4<f32>, CloudMaskError> {
        InputNormalizer::new().normalize(ModelVersion::V1, input)
    }

    fn assert_invalid(result: Result<Array4<f32>, CloudMaskError>, expected: &InvalidInputKind) {
        match result {
            Err(CloudMaskError::InvalidInput { kind }) => assert_eq!(&kind, expected),
            other => panic!("expected invalid input, got {:?}", other.map(|t| t.dim())),
        }
    }

    // Tests images are resized to 256x256 with zeroed extra bands
    // Verified by filling extra bands with the blue channel
    #[test]
    fn test_image_tensor_shape() {
        let input = RawInput::new(gradient_png(300, 200)).with_name("scene.png");
        let tensor = normalize(&input).expect("Normalization failed");

        assert_eq!(tensor.dim(), (1, 256, 256, 8));
        assert!(tensor.slice(s![.., .., .., 3..]).iter().all(|&v| v == 0.0));
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(tensor.slice(s![.., .., .., ..3]).iter().any(|&v| v > 0.5));
    }

    // Tests a uniform image keeps its exact unit-scaled value
    // Verified by dividing by 256 instead of 255
    #[test]
    fn test_image_unit_scale() {
        let image = image::RgbImage::from_pixel(10, 10, image::Rgb([51, 102, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("Failed to encode");

        let tensor = normalize(&RawInput::new(bytes)).expect("Normalization failed");
        assert!((tensor[[0, 128, 128, 0]] - 0.2).abs() < 1e-6);
        assert!((tensor[[0, 128, 128, 1]] - 0.4).abs() < 1e-6);
        assert!((tensor[[0, 128, 128, 2]] - 1.0).abs() < 1e-6);
    }

    // Tests undecodable image bytes are rejected as invalid input
    // Verified by mapping decode errors to internal errors
    #[test]
    fn test_image_decode_failure() {
        let result = normalize(&RawInput::new(vec![0x89, 0x50, 0x00]).with_name("broken.png"));
        assert!(matches!(
            result,
            Err(CloudMaskError::InvalidInput {
                kind: InvalidInputKind::DecodeFailure { format: "image", .. }
            })
        ));
    }

    // Tests arrays keep their values and spatial size
    // Verified by resizing arrays to 256x256
    #[test]
    fn test_array_passthrough() {
        let array = ArrayD::from_shape_fn(IxDyn(&[3, 5, 8]), |idx| {
            (idx[0] * 100 + idx[1] * 10 + idx[2]) as f32 * 1.5
        });
        let input = RawInput::new(npy_bytes(&array)).with_name("bands.npy");
        let tensor = normalize(&input).expect("Normalization failed");

        assert_eq!(tensor.dim(), (1, 3, 5, 8));
        assert!((tensor[[0, 2, 4, 7]] - 247.0 * 1.5).abs() < 1e-3);
    }

    // Tests an npy upload sent as generic binary is read as an array
    // Verified by routing generic media types to the image decoder
    #[test]
    fn test_array_generic_media_type() {
        let array = ArrayD::<f32>::from_elem(IxDyn(&[4, 4, 8]), 0.5);
        let input = RawInput::new(npy_bytes(&array))
            .with_name("scene.npy")
            .with_media_type("application/octet-stream");
        let tensor = normalize(&input).expect("Normalization failed");

        assert_eq!(tensor.dim(), (1, 4, 4, 8));
        assert!(tensor.iter().all(|&v| (v - 0.5).abs() < f32::EPSILON));
    }

    // Tests float64 arrays are accepted and cast to float32
    // Verified by reading only float32 payloads
    #[test]
    fn test_array_f64_accepted() {
        let array = ArrayD::<f64>::from_elem(IxDyn(&[2, 2, 8]), 0.25);
        let input = RawInput::new(npy_bytes_f64(&array)).with_name("bands.npy");
        let tensor = normalize(&input).expect("Normalization failed");

        assert!(tensor.iter().all(|&v| (v - 0.25).abs() < f32::EPSILON));
    }

    // Tests the wrong band count is reported with expected and found counts
    // Verified by checking shape before channel count
    #[test]
    fn test_array_channel_count() {
        let array = ArrayD::<f32>::zeros(IxDyn(&[256, 256, 7]));
        let input = RawInput::new(npy_bytes(&array)).with_name("bands.npy");

        assert_invalid(
            normalize(&input),
            &InvalidInputKind::InvalidChannelCount {
                expected: 8,
                found: 7,
            },
        );
    }

    // Tests arrays with eight bands but the wrong rank are rejected
    // Verified by accepting any array with eight trailing bands
    #[test]
    fn test_array_rank() {
        let array = ArrayD::<f32>::zeros(IxDyn(&[1, 4, 4, 8]));
        let input = RawInput::new(npy_bytes(&array)).with_name("bands.npy");

        assert_invalid(
            normalize(&input),
            &InvalidInputKind::InvalidShape {
                shape: vec![1, 4, 4, 8],
            },
        );
    }

    // Tests arrays with no pixels are rejected
    // Verified by allowing zero-height arrays
    #[test]
    fn test_array_empty_spatial() {
        let array = ArrayD::<f32>::zeros(IxDyn(&[0, 4, 8]));
        let input = RawInput::new(npy_bytes(&array)).with_name("bands.npy");

        assert_invalid(
            normalize(&input),
            &InvalidInputKind::InvalidShape {
                shape: vec![0, 4, 8],
            },
        );
    }

    // Tests empty payloads are reported as a missing file
    // Verified by passing empty payloads to the decoder
    #[test]
    fn test_empty_payload() {
        assert_invalid(
            normalize(&RawInput::new(Vec::new())),
            &InvalidInputKind::MissingFile,
        );
    }

    // Tests npy bytes declared as an image are decoded as an image and fail
    // Verified by sniffing content instead of trusting metadata
    #[test]
    fn test_declared_modality_trusted() {
        let array = ArrayD::<f32>::zeros(IxDyn(&[2, 2, 8]));
        let input = RawInput::new(npy_bytes(&array)).with_name("bands.png");

        assert!(matches!(
            normalize(&input),
            Err(CloudMaskError::InvalidInput {
                kind: InvalidInputKind::DecodeFailure { .. }
            })
        ));
    }
}
