//! Mini Feed Core - image preparation and data model
//!
//! This crate holds everything the Mini Feed client does without touching the
//! network: turning a picked photo into a bounded JPEG payload, measuring and
//! formatting payload sizes, checking form input, and the `Post`/`User` types
//! the backend returns.
//!
//! # Module Structure
//!
//! - `decode` - Decode any supported image and bound its width
//! - `encode` - JPEG encoding and `data:` URI wrapping
//! - `prepare` - The full compression pipeline used before upload
//! - `size` - Decoded payload size and human-readable formatting
//! - `selection` - Type and size checks on a picked file
//! - `validate` - Post and sign-in form rules
//! - `model` - Backend entities and JSON envelopes

pub mod decode;
pub mod encode;
pub mod model;
pub mod prepare;
pub mod selection;
pub mod size;
pub mod validate;

pub use model::{AuthSession, NewPost, Post, User};
pub use prepare::{compress_image, CompressOptions, CompressedImage, PrepareError};
pub use selection::{check_selection, SelectedImage, SelectionError};
pub use size::{decoded_size, format_file_size, MAX_SELECTION_BYTES, MAX_UPLOAD_BYTES};
pub use validate::ValidationError;
