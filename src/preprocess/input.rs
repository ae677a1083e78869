//! Raw request payloads and their declared modality

use crate::io::configuration::{GENERIC_MEDIA_TYPES, NPY_EXTENSION, NPY_MEDIA_TYPE};
use crate::io::error::{CloudMaskError, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Input modality, decided from declared metadata rather than content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Encoded color image (PNG, JPEG, TIFF, ...)
    Image,
    /// Serialized `(H, W, 8)` numeric array in `.npy` format
    ScientificArray,
}

impl InputKind {
    /// Classify from a declared media type, falling back to the declared file name
    ///
    /// A specific media type is authoritative. A missing, empty or generic
    /// binary type counts as undeclared: then a `.npy` extension (any case)
    /// selects the array modality and anything else is treated as an image.
    pub fn from_declared(media_type: Option<&str>, name: Option<&str>) -> Self {
        let essence = media_type
            .and_then(|m| m.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty() && !GENERIC_MEDIA_TYPES.contains(&m.as_str()));

        if let Some(essence) = essence {
            return if essence == NPY_MEDIA_TYPE || essence == "application/npy" {
                Self::ScientificArray
            } else {
                Self::Image
            };
        }

        let is_npy = name
            .and_then(|n| Path::new(n).extension())
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(NPY_EXTENSION));

        if is_npy {
            Self::ScientificArray
        } else {
            Self::Image
        }
    }

    /// Format name used in decode error messages
    pub const fn format_name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::ScientificArray => "npy",
        }
    }
}

/// An uploaded file: its bytes plus whatever metadata the caller declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    name: Option<String>,
    media_type: Option<String>,
    bytes: Vec<u8>,
}

impl RawInput {
    /// Wrap an in-memory payload with no declared metadata
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self {
            name: None,
            media_type: None,
            bytes,
        }
    }

    /// Rewind `reader` to its start and consume it once
    ///
    /// # Errors
    ///
    /// Returns an error if seeking or reading fails
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .seek(SeekFrom::Start(0))
            .and_then(|_| reader.read_to_end(&mut bytes))
            .map_err(|e| CloudMaskError::FileSystem {
                path: "<stream>".into(),
                operation: "read upload",
                source: e,
            })?;
        Ok(Self::new(bytes))
    }

    /// Read a file, declaring its file name
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CloudMaskError::FileSystem {
            path: path.to_path_buf(),
            operation: "read input",
            source: e,
        })?;

        let input = Self::new(bytes);
        Ok(match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => input.with_name(name),
            None => input,
        })
    }

    /// Declare the original file name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare the media type
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Declared file name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared media type, if any
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Payload bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the payload carries no data
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Modality declared by this payload's metadata
    pub fn kind(&self) -> InputKind {
        InputKind::from_declared(self.media_type(), self.name())
    }
}
