//! JPEG encoding of the resized surface.
//!
//! Uses the `image` crate's JPEG encoder. Quality arrives either on the
//! encoder's native 1-100 scale or as the 0-1 factor the upload flow is
//! configured with; `quality_to_jpeg` converts between the two.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality factor outside (0, 1]
    #[error("Invalid quality factor {0}: must be greater than 0 and at most 1")]
    InvalidQuality(f32),

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Map a quality factor in (0, 1] onto the JPEG encoder's 1-100 scale.
///
/// # Errors
///
/// Returns `EncodeError::InvalidQuality` for zero, negative, NaN or
/// values above 1.
pub fn quality_to_jpeg(quality: f32) -> Result<u8, EncodeError> {
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(EncodeError::InvalidQuality(quality));
    }
    Ok(((quality * 100.0).round() as u8).max(1))
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, clamped)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
