//! Raw class arg-max and the fixed raw-to-display class table

use crate::io::configuration::DISPLAY_CLASS_COUNT;
use crate::model::provider::RawPrediction;
use ndarray::{Array2, ArrayView1, Axis};

/// User-facing class of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DisplayClass {
    /// No cloud or shadow
    #[default]
    Clear,
    /// Cloud shadow
    Shadow,
    /// Semi-transparent cloud
    ThinCloud,
    /// Opaque cloud
    ThickCloud,
}

impl DisplayClass {
    /// All display classes in index order
    pub const ALL: [Self; DISPLAY_CLASS_COUNT] =
        [Self::Clear, Self::Shadow, Self::ThinCloud, Self::ThickCloud];

    /// Integer code of this class in the display mask
    pub const fn index(self) -> usize {
        match self {
            Self::Clear => 0,
            Self::Shadow => 1,
            Self::ThinCloud => 2,
            Self::ThickCloud => 3,
        }
    }

    /// Class for an integer mask code
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Clear),
            1 => Some(Self::Shadow),
            2 => Some(Self::ThinCloud),
            3 => Some(Self::ThickCloud),
            _ => None,
        }
    }

    /// Display class for a raw model class
    ///
    /// Fill and clear both display as clear; any index past the table also
    /// displays as clear.
    pub const fn from_raw(raw: usize) -> Self {
        match raw {
            2 => Self::Shadow,
            3 => Self::ThinCloud,
            4 => Self::ThickCloud,
            _ => Self::Clear,
        }
    }

    /// Human-readable class name
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Shadow => "Shadow",
            Self::ThinCloud => "Thin Cloud",
            Self::ThickCloud => "Thick Cloud",
        }
    }
}

/// Per-pixel display classes, `(H, W)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMask {
    classes: Array2<DisplayClass>,
}

impl DisplayMask {
    /// Wrap an array of classes
    pub const fn new(classes: Array2<DisplayClass>) -> Self {
        Self { classes }
    }

    /// Build from integer codes, treating unknown codes as clear
    pub fn from_indices(indices: &Array2<u8>) -> Self {
        Self::new(indices.mapv(|i| DisplayClass::from_index(usize::from(i)).unwrap_or_default()))
    }

    /// Mask dimensions `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        self.classes.dim()
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the mask has no pixels
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<DisplayClass> {
        self.classes.get((row, col)).copied()
    }

    /// Underlying class array
    pub const fn classes(&self) -> &Array2<DisplayClass> {
        &self.classes
    }

    /// Integer codes in `{0, 1, 2, 3}`
    pub fn to_indices(&self) -> Array2<u8> {
        self.classes.mapv(|c| c.index() as u8)
    }

    /// Pixel count per class, indexed by [`DisplayClass::index`]
    pub fn histogram(&self) -> [usize; DISPLAY_CLASS_COUNT] {
        let mut counts = [0usize; DISPLAY_CLASS_COUNT];
        for class in &self.classes {
            if let Some(count) = counts.get_mut(class.index()) {
                *count += 1;
            }
        }
        counts
    }
}

/// Index of the largest value; the lowest index wins ties
///
/// NaN compares above every number, so the first NaN lane wins.
pub fn argmax(lane: ArrayView1<'_, f32>) -> usize {
    let mut best_index = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (index, &value) in lane.iter().enumerate() {
        if value.is_nan() {
            return index;
        }
        if value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    best_index
}

/// Arg-max each pixel over the raw classes and map it through the display table
///
/// Only the first batch entry is used; an empty batch yields an empty mask.
pub fn remap(prediction: &RawPrediction) -> DisplayMask {
    let classes = prediction.outer_iter().next().map_or_else(
        || Array2::default((0, 0)),
        |sample| sample.map_axis(Axis(2), |lane| DisplayClass::from_raw(argmax(lane))),
    );
    DisplayMask::new(classes)
}
