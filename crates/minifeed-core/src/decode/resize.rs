//! Width-bounded resizing for upload preparation.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if either target dimension is zero.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Scale an image down so its width does not exceed `max_width`.
///
/// Height follows the same ratio. Images that are already narrow enough are
/// returned unchanged; this never upscales.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if `max_width` is zero.
pub fn resize_to_max_width(
    image: &DecodedImage,
    max_width: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_width == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    let (width, height) = calculate_bounded_dimensions(image.width, image.height, max_width);
    resize(image, width, height, filter)
}

/// Dimensions after bounding `width` by `max_width`, preserving aspect ratio.
///
/// `ratio = max_width / width`, `height = round(height * ratio)`, at least 1.
pub fn calculate_bounded_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || height == 0 {
        return (width, height);
    }

    let ratio = max_width as f64 / width as f64;
    let new_height = (height as f64 * ratio).round() as u32;
    (max_width, new_height.max(1))
}
