//! Payload size arithmetic and human-readable formatting.

use crate::encode::base64_payload;

/// Hard ceiling on the decoded size of a compressed upload (2 MiB).
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Largest file accepted from the picker before compression (10 MiB).
pub const MAX_SELECTION_BYTES: u64 = 10 * 1024 * 1024;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Decoded byte length of a base64 payload without decoding it.
///
/// Computes `floor(len * 3 / 4) - padding`, where padding counts the
/// trailing `=` characters. A `data:...;base64,` header is skipped first so
/// a data URI measures the bytes it carries.
pub fn decoded_size(payload: &str) -> usize {
    let text = base64_payload(payload).as_bytes();
    let padding = text.iter().rev().take(2).take_while(|&&b| b == b'=').count();
    (text.len() * 3 / 4).saturating_sub(padding)
}

/// Format a byte count with the largest unit it fills, to two decimals.
///
/// `0` is the literal `"0 Bytes"`; counts beyond the GB range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit < UNITS.len() - 1 && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }

    format!("{:.2} {}", bytes as f64 / scale as f64, UNITS[unit])
}
