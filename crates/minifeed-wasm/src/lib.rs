//! Mini Feed WASM - WebAssembly bindings for Mini Feed
//!
//! Exposes the upload preparation from `minifeed-core` to the web client so
//! the browser compresses and measures photos with the same code as the
//! command line.
//!
//! # Module Structure
//!
//! - `prepare` - Compress a picked file into a JPEG data URI
//! - `size` - Payload size, size formatting and the picked-file check
//! - `types` - WASM-compatible wrapper for the compressed result
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image, format_file_size } from '@minifeed/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = compress_image(bytes, 1200, 0.8);
//! console.log(`${image.width}x${image.height}, ${format_file_size(image.decoded_size)}`);
//! ```

use wasm_bindgen::prelude::*;

mod prepare;
mod size;
mod types;

pub use prepare::{compress_image, compress_for_upload};
pub use size::{check_selection, decoded_size, format_file_size, max_upload_bytes};
pub use types::JsCompressedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
