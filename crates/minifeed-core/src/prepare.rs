//! Upload preparation: decode, bound the width, re-encode as JPEG.
//!
//! `compress_image` is the single entry point. It runs the stages strictly in
//! order (decode, resize, encode, wrap) and exposes nothing in between, so a
//! caller either gets a finished payload or the error of the first stage that
//! failed.

use base64::{engine::general_purpose::STANDARD, Engine};
use log::debug;
use thiserror::Error;

use crate::decode::{decode_image, resize_to_max_width, DecodeError, FilterType};
use crate::encode::{base64_payload, encode_jpeg, quality_to_jpeg, to_data_uri, EncodeError};
use crate::size::decoded_size;

/// Width bound used by the post submission flow.
pub const DEFAULT_MAX_WIDTH: u32 = 1200;

/// Quality factor used by the post submission flow.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Errors from the preparation pipeline.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Failed to process image file: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),
}

/// Parameters of one compression pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressOptions {
    /// Maximum output width in pixels; narrower images keep their size.
    pub max_width: u32,
    /// Lossy quality factor in (0, 1].
    pub quality: f32,
    /// Interpolation used when scaling down.
    pub filter: FilterType,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
            filter: FilterType::Lanczos3,
        }
    }
}

impl CompressOptions {
    pub fn new(max_width: u32, quality: f32) -> Self {
        Self {
            max_width,
            quality,
            ..Self::default()
        }
    }
}

/// A re-encoded, size-bounded image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    data_uri: String,
    width: u32,
    height: u32,
}

impl CompressedImage {
    /// Wrap an already encoded payload.
    ///
    /// Used when the payload was produced elsewhere (for example by a
    /// browser canvas) but still has to go through the size check.
    pub fn from_data_uri(data_uri: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            data_uri: data_uri.into(),
            width,
            height,
        }
    }

    /// The full `data:image/jpeg;base64,...` payload.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn into_data_uri(self) -> String {
        self.data_uri
    }

    /// The base64 text after the data URI header.
    pub fn base64_payload(&self) -> &str {
        base64_payload(&self.data_uri)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decoded byte length of the JPEG carried by the payload.
    pub fn decoded_size(&self) -> usize {
        decoded_size(&self.data_uri)
    }

    /// The JPEG file carried by the payload.
    pub fn jpeg_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        STANDARD
            .decode(self.base64_payload())
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))
    }
}

/// Compress an image for upload.
///
/// # Errors
///
/// Returns `PrepareError::Decode` if the bytes are not a decodable image or
/// `max_width` is zero, and `PrepareError::Encode` for a quality factor
/// outside (0, 1].
pub fn compress_image(
    bytes: &[u8],
    options: &CompressOptions,
) -> Result<CompressedImage, PrepareError> {
    let quality = quality_to_jpeg(options.quality)?;

    let decoded = decode_image(bytes)?;
    let surface = resize_to_max_width(&decoded, options.max_width, options.filter)?;
    let jpeg = encode_jpeg(&surface.pixels, surface.width, surface.height, quality)?;

    debug!(
        "compressed {}x{} -> {}x{} at q{} ({} bytes in, {} bytes out)",
        decoded.width,
        decoded.height,
        surface.width,
        surface.height,
        quality,
        bytes.len(),
        jpeg.len()
    );

    Ok(CompressedImage {
        data_uri: to_data_uri(&jpeg),
        width: surface.width,
        height: surface.height,
    })
}
