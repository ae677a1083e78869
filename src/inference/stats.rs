//! Coverage percentages per display class

use crate::inference::remap::{DisplayClass, DisplayMask};
use crate::io::configuration::SHADOW_PRESENCE_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Share of the image covered by each display class, in percent
///
/// Serialized with the class names as keys; this is also the input contract
/// of the narrative report generator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassPercentages {
    /// Clear sky
    #[serde(rename = "Clear")]
    pub clear: f64,
    /// Cloud shadow
    #[serde(rename = "Shadow")]
    pub shadow: f64,
    /// Thin cloud
    #[serde(rename = "Thin Cloud")]
    pub thin_cloud: f64,
    /// Thick cloud
    #[serde(rename = "Thick Cloud")]
    pub thick_cloud: f64,
}

impl ClassPercentages {
    /// Histogram the mask and scale each bin to a percentage of all pixels
    ///
    /// An empty mask yields all zeros.
    pub fn from_mask(mask: &DisplayMask) -> Self {
        let total = mask.len();
        if total == 0 {
            return Self::default();
        }

        let [clear, shadow, thin_cloud, thick_cloud] =
            mask.histogram().map(|count| count as f64 / total as f64 * 100.0);
        Self {
            clear,
            shadow,
            thin_cloud,
            thick_cloud,
        }
    }

    /// Percentage for one class
    pub const fn get(&self, class: DisplayClass) -> f64 {
        match class {
            DisplayClass::Clear => self.clear,
            DisplayClass::Shadow => self.shadow,
            DisplayClass::ThinCloud => self.thin_cloud,
            DisplayClass::ThickCloud => self.thick_cloud,
        }
    }

    /// Sum over all classes, 100 up to rounding for a non-empty mask
    pub fn total(&self) -> f64 {
        self.clear + self.shadow + self.thin_cloud + self.thick_cloud
    }

    /// Whether shadow covers more than the presence threshold
    pub fn has_shadow(&self) -> bool {
        self.shadow > SHADOW_PRESENCE_THRESHOLD
    }
}

/// Coverage percentages of `mask`
pub fn percentages(mask: &DisplayMask) -> ClassPercentages {
    ClassPercentages::from_mask(mask)
}
