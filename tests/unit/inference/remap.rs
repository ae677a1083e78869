//! Tests for arg-max selection and the raw-to-display class table

#[cfg(test)]
mod tests {
    use crate::support::one_hot_prediction;
    use cloudmask::inference::remap::{argmax, remap};
    use cloudmask::inference::{DisplayClass, DisplayMask};
    use ndarray::{Array2, Array4, arr1};

    // Tests the fixed raw-to-display table
    // Verified by mapping fill to shadow
    #[test]
    fn test_raw_table() {
        assert_eq!(DisplayClass::from_raw(0), DisplayClass::Clear);
        assert_eq!(DisplayClass::from_raw(1), DisplayClass::Clear);
        assert_eq!(DisplayClass::from_raw(2), DisplayClass::Shadow);
        assert_eq!(DisplayClass::from_raw(3), DisplayClass::ThinCloud);
        assert_eq!(DisplayClass::from_raw(4), DisplayClass::ThickCloud);
        assert_eq!(DisplayClass::from_raw(17), DisplayClass::Clear);
    }

    // Tests display indices round-trip and stay in 0..4
    // Verified by offsetting indices by one
    #[test]
    fn test_display_indices() {
        for (expected, class) in DisplayClass::ALL.into_iter().enumerate() {
            assert_eq!(class.index(), expected);
            assert_eq!(DisplayClass::from_index(expected), Some(class));
        }
        assert_eq!(DisplayClass::from_index(4), None);
        assert_eq!(DisplayClass::ThinCloud.label(), "Thin Cloud");
    }

    // Tests ties resolve to the lowest index
    // Verified by using >= in the comparison
    #[test]
    fn test_argmax_ties() {
        assert_eq!(argmax(arr1(&[0.2, 0.4, 0.4, 0.0, 0.0]).view()), 1);
        assert_eq!(argmax(arr1(&[0.3, 0.3, 0.3, 0.3, 0.3]).view()), 0);
        assert_eq!(argmax(arr1(&[0.0, 0.1, 0.2, 0.3, 0.9]).view()), 4);
    }

    // Tests the first NaN wins over every number
    // Verified by skipping NaN values in the comparison
    #[test]
    fn test_argmax_nan_first() {
        assert_eq!(argmax(arr1(&[0.9, f32::NAN, 0.1, f32::NAN, 0.0]).view()), 1);
        assert_eq!(argmax(arr1(&[f32::NAN, 0.2, 0.3, 0.4, 0.5]).view()), 0);
        assert_eq!(argmax(arr1(&[0.1, 0.2, 0.3, 0.4, f32::NAN]).view()), 4);
    }

    // Tests each pixel follows the arg-max of its own lane
    // Verified by transposing rows and columns
    #[test]
    fn test_remap_per_pixel() {
        let prediction = one_hot_prediction(2, 3, |row, col| (row * 3 + col) % 5);
        let mask = remap(&prediction);

        assert_eq!(mask.dim(), (2, 3));
        assert_eq!(mask.get(0, 0), Some(DisplayClass::Clear));
        assert_eq!(mask.get(0, 2), Some(DisplayClass::Shadow));
        assert_eq!(mask.get(1, 0), Some(DisplayClass::ThinCloud));
        assert_eq!(mask.get(1, 1), Some(DisplayClass::ThickCloud));
        assert_eq!(mask.get(1, 2), Some(DisplayClass::Clear));
        assert_eq!(mask.get(2, 0), None);
    }

    // Tests an empty batch produces an empty mask
    // Verified by indexing the first batch entry directly
    #[test]
    fn test_remap_empty_batch() {
        let mask = remap(&Array4::<f32>::zeros((0, 4, 4, 5)));
        assert!(mask.is_empty());
    }

    // Tests histogram counts and integer code conversion
    // Verified by counting unknown codes as thick cloud
    #[test]
    fn test_histogram_and_indices() {
        let codes = Array2::from_shape_vec((2, 3), vec![0u8, 1, 1, 3, 3, 9]).expect("bad shape");
        let mask = DisplayMask::from_indices(&codes);

        assert_eq!(mask.histogram(), [2, 2, 0, 2]);
        assert_eq!(mask.len(), 6);
        assert_eq!(mask.to_indices()[[1, 2]], 0);
        assert_eq!(mask.classes()[[1, 0]], DisplayClass::ThickCloud);
    }
}
