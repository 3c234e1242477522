//! Upload preparation bindings.
//!
//! # Example
//!
//! ```typescript
//! import { compress_for_upload, max_upload_bytes } from '@minifeed/wasm';
//!
//! const image = compress_for_upload(bytes);
//! if (image.decoded_size > max_upload_bytes()) {
//!   throw new Error('Image is too large');
//! }
//! await createPost({ description, imageBase64: image.data_uri });
//! ```

use crate::types::JsCompressedImage;
use minifeed_core::{prepare, CompressOptions, PrepareError};
use wasm_bindgen::prelude::*;

fn compress(bytes: &[u8], options: &CompressOptions) -> Result<JsCompressedImage, PrepareError> {
    prepare::compress_image(bytes, options).map(JsCompressedImage::from_compressed)
}

/// Compress a picked image with an explicit width bound and quality.
///
/// # Arguments
///
/// * `bytes` - The file contents (JPEG, PNG, GIF or WebP)
/// * `max_width` - Widest allowed output in pixels; narrower images keep their size
/// * `quality` - Lossy quality factor in (0, 1]
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or the quality is out of
/// range.
#[wasm_bindgen]
pub fn compress_image(
    bytes: &[u8],
    max_width: u32,
    quality: f32,
) -> Result<JsCompressedImage, JsValue> {
    compress(bytes, &CompressOptions::new(max_width, quality))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Compress with the settings the post form uses (1200px, 0.8).
#[wasm_bindgen]
pub fn compress_for_upload(bytes: &[u8]) -> Result<JsCompressedImage, JsValue> {
    compress(bytes, &CompressOptions::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}
