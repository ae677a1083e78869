//! Input payload handling and tensor normalization

/// Raw payloads and declared input modality
pub mod input;
/// Per-modality conversion into model input tensors
pub mod normalize;

pub use input::{InputKind, RawInput};
pub use normalize::{InputNormalizer, InputTensor};
