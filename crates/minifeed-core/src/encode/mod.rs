//! Image encoding for upload.
//!
//! This module provides functionality for:
//! - Encoding RGB surfaces to JPEG with a configurable quality
//! - Wrapping the JPEG bytes as a base64 `data:` URI payload
//!
//! # Examples
//!
//! ```ignore
//! use minifeed_core::encode::{encode_jpeg, quality_to_jpeg, to_data_uri};
//!
//! let pixels = vec![128u8; 100 * 100 * 3];
//! let jpeg = encode_jpeg(&pixels, 100, 100, quality_to_jpeg(0.8).unwrap()).unwrap();
//! let payload = to_data_uri(&jpeg);
//! ```

mod data_uri;
mod jpeg;

pub use data_uri::{base64_payload, to_data_uri, JPEG_DATA_URI_PREFIX};
pub use jpeg::{encode_jpeg, quality_to_jpeg, EncodeError};
