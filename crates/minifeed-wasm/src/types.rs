//! WASM-compatible wrapper for the compression result.

use minifeed_core::CompressedImage;
use wasm_bindgen::prelude::*;

/// A compressed photo ready to be sent as `imageBase64`.
///
/// The payload lives in WASM memory; reading `data_uri` copies it into a
/// JavaScript string.
#[wasm_bindgen]
pub struct JsCompressedImage {
    inner: CompressedImage,
}

#[wasm_bindgen]
impl JsCompressedImage {
    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// The full `data:image/jpeg;base64,...` string
    #[wasm_bindgen(getter)]
    pub fn data_uri(&self) -> String {
        self.inner.data_uri().to_string()
    }

    /// Size of the JPEG behind the payload, in bytes
    #[wasm_bindgen(getter)]
    pub fn decoded_size(&self) -> usize {
        self.inner.decoded_size()
    }
}

impl JsCompressedImage {
    pub(crate) fn from_compressed(inner: CompressedImage) -> Self {
        Self { inner }
    }
}
