//! The image a user picked for a new post, checked before compression.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::size::MAX_SELECTION_BYTES;

/// Reasons a picked file is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select a valid image file")]
    NotAnImage { mime_type: String },

    #[error("Image size should be less than 10MB")]
    TooLarge { size: u64 },

    #[error("Failed to read image file: {0}")]
    Read(String),
}

/// Check a picked file's declared type and size.
///
/// The MIME type must start with `image/` and the size must not exceed
/// `MAX_SELECTION_BYTES`.
pub fn check_selection(mime_type: &str, size: u64) -> Result<(), SelectionError> {
    if !mime_type.starts_with("image/") {
        return Err(SelectionError::NotAnImage {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_SELECTION_BYTES {
        return Err(SelectionError::TooLarge { size });
    }
    Ok(())
}

/// A picked image that passed `check_selection`.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl SelectedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, SelectionError> {
        let mime_type = mime_type.into();
        check_selection(&mime_type, bytes.len() as u64)?;
        Ok(Self { bytes, mime_type })
    }

    /// Read a file from disk, taking its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        // Oversized files are refused before any bytes are read
        let size = std::fs::metadata(path)
            .map_err(|e| SelectionError::Read(e.to_string()))?
            .len();
        check_selection(&mime_type, size)?;

        let bytes = std::fs::read(path).map_err(|e| SelectionError::Read(e.to_string()))?;
        Self::new(bytes, mime_type)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Confirmation shown once a file is accepted.
    pub fn selection_notice(&self) -> String {
        let megabytes = self.size() as f64 / (1024.0 * 1024.0);
        format!("Image selected ({megabytes:.1}MB) - will be compressed automatically")
    }
}

impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}
