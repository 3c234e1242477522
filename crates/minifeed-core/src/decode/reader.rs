//! Image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};
use log::debug;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The format is guessed from the content, so JPEG, PNG, GIF and WebP
/// selections all take this path. The result is always RGB8; alpha is
/// dropped because the re-encoded output is a JPEG.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for an empty buffer,
/// `DecodeError::InvalidFormat` if the format cannot be recognized and
/// `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = decode_dynamic(bytes)?;
    let orientation = extract_orientation(bytes);
    let img = apply_orientation(img, orientation);

    let decoded = DecodedImage::from_rgb_image(img.into_rgb8());
    debug!(
        "decoded {}x{} image ({:?})",
        decoded.width, decoded.height, orientation
    );
    Ok(decoded)
}

/// Read the displayed dimensions of an image without decoding its pixels.
///
/// Orientations that rotate by 90 or 270 degrees report swapped dimensions,
/// matching what `decode_image` would produce.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let reader = guessed_reader(bytes)?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if extract_orientation(bytes).swaps_dimensions() {
        Ok((height, width))
    } else {
        Ok((width, height))
    }
}

fn guessed_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    guessed_reader(bytes)?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
