//! Self-contained `data:` URI wrapping for encoded JPEG payloads.

use base64::{engine::general_purpose::STANDARD, Engine};

/// Prefix of every payload produced by `to_data_uri`.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Wrap JPEG bytes as `data:image/jpeg;base64,<payload>`.
pub fn to_data_uri(jpeg: &[u8]) -> String {
    let mut uri = String::with_capacity(JPEG_DATA_URI_PREFIX.len() + jpeg.len().div_ceil(3) * 4);
    uri.push_str(JPEG_DATA_URI_PREFIX);
    STANDARD.encode_string(jpeg, &mut uri);
    uri
}

/// Return the base64 text of a `data:` URI, or the input unchanged when it
/// carries no `;base64,` header.
pub fn base64_payload(text: &str) -> &str {
    if text.starts_with("data:") {
        if let Some(index) = text.find(";base64,") {
            return &text[index + ";base64,".len()..];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_data_uri() {
        assert_eq!(to_data_uri(&[0xFF, 0xD8, 0xFF]), "data:image/jpeg;base64,/9j/");
        assert_eq!(to_data_uri(&[]), JPEG_DATA_URI_PREFIX);
    }

    #[test]
    fn test_base64_payload_strips_header() {
        assert_eq!(base64_payload("data:image/png;base64,iVBORw=="), "iVBORw==");
        assert_eq!(base64_payload("/9j/4AAQ"), "/9j/4AAQ");
        assert_eq!(base64_payload("data:text/plain,hello"), "data:text/plain,hello");
    }

    #[test]
    fn test_payload_decodes_back_to_input() {
        let bytes: Vec<u8> = (0u8..=200).collect();
        let uri = to_data_uri(&bytes);
        assert_eq!(STANDARD.decode(base64_payload(&uri)).unwrap(), bytes);
    }
}
