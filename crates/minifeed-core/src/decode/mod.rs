//! Image decoding and resizing.
//!
//! This module provides functionality for:
//! - Decoding any supported image format (JPEG, PNG, GIF, WebP) to RGB8
//! - Applying EXIF orientation so the output is displayed upright
//! - Bounding an image's width while preserving its aspect ratio
//!
//! # Examples
//!
//! ```ignore
//! use minifeed_core::decode::{decode_image, resize_to_max_width, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let bounded = resize_to_max_width(&image, 1200, FilterType::Lanczos3).unwrap();
//! println!("{}x{} -> {}x{}", image.width, image.height, bounded.width, bounded.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, image_dimensions};
pub use resize::{calculate_bounded_dimensions, resize, resize_to_max_width};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
