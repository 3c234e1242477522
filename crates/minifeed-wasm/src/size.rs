//! Size bindings: measuring payloads and checking picked files.

use minifeed_core::{selection, size};
use wasm_bindgen::prelude::*;

/// Decoded byte length of a base64 payload or `data:` URI.
#[wasm_bindgen]
pub fn decoded_size(payload: &str) -> usize {
    size::decoded_size(payload)
}

/// Byte count as text, e.g. `1.50 MB`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    size::format_file_size(bytes.max(0.0) as u64)
}

/// Largest compressed payload the backend accepts.
#[wasm_bindgen]
pub fn max_upload_bytes() -> usize {
    size::MAX_UPLOAD_BYTES
}

/// Check a picked file before compressing it.
///
/// Returns the message to show, or `undefined` when the file is acceptable.
#[wasm_bindgen]
pub fn check_selection(mime_type: &str, size: f64) -> Option<String> {
    selection::check_selection(mime_type, size.max(0.0) as u64)
        .err()
        .map(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_size() {
        assert_eq!(decoded_size("QUJD"), 3);
        assert_eq!(decoded_size("data:image/jpeg;base64,QUI="), 2);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0.0), "0 Bytes");
        assert_eq!(format_file_size(1024.0), "1.00 KB");
        assert_eq!(format_file_size(-5.0), "0 Bytes");
    }

    #[test]
    fn test_check_selection() {
        assert_eq!(check_selection("image/png", 1024.0), None);
        assert_eq!(
            check_selection("application/pdf", 1024.0).as_deref(),
            Some("Please select a valid image file")
        );
        assert_eq!(
            check_selection("image/jpeg", 11.0 * 1024.0 * 1024.0).as_deref(),
            Some("Image size should be less than 10MB")
        );
    }

    #[test]
    fn test_max_upload_bytes() {
        assert_eq!(max_upload_bytes(), 2 * 1024 * 1024);
    }
}
