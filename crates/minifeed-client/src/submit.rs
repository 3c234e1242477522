//! Turning a description and a picked image into a created post.

use log::{debug, info, warn};
use minifeed_core::validate::validate_post_form;
use minifeed_core::{
    compress_image, format_file_size, CompressOptions, CompressedImage, NewPost, Post,
    PrepareError, SelectedImage, ValidationError, MAX_UPLOAD_BYTES,
};
use thiserror::Error;

use crate::api::{ApiError, PostsApi};

/// Shown when a create fails without a more specific message.
pub const CREATE_FAILED: &str = "Failed to create post";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The compressed payload is over `MAX_UPLOAD_BYTES`.
    #[error("Image is too large ({}). Please choose a smaller image.", formatted(.size))]
    TooLarge { size: usize },

    #[error(transparent)]
    Prepare(#[from] PrepareError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Image processing stopped unexpectedly: {0}")]
    Interrupted(String),

    #[error("A post is already being created")]
    InFlight,
}

fn formatted(size: &usize) -> String {
    format_file_size(*size as u64)
}

impl SubmitError {
    /// One line for the person who pressed "post".
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(_) | SubmitError::TooLarge { .. } | SubmitError::InFlight => {
                self.to_string()
            }
            SubmitError::Api(err) => err
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| CREATE_FAILED.to_string()),
            SubmitError::Prepare(_) | SubmitError::Interrupted(_) => CREATE_FAILED.to_string(),
        }
    }
}

/// Validate, compress and upload a new post.
///
/// Nothing reaches the network unless validation passes and the compressed
/// payload fits in `MAX_UPLOAD_BYTES`.
pub async fn submit_post(
    api: &dyn PostsApi,
    description: &str,
    image: Option<&SelectedImage>,
) -> Result<Post, SubmitError> {
    let description = validate_post_form(description, image)?;
    let image = image.ok_or(ValidationError::ImageRequired)?;

    let bytes = image.bytes().to_vec();
    let compressed = tokio::task::spawn_blocking(move || {
        compress_image(&bytes, &CompressOptions::default())
    })
    .await
    .map_err(|e| {
        warn!("compression task failed: {}", e);
        SubmitError::Interrupted(e.to_string())
    })??;

    submit_compressed(api, description, compressed).await
}

/// Size-check an already compressed payload and upload it.
pub async fn submit_compressed(
    api: &dyn PostsApi,
    description: &str,
    image: CompressedImage,
) -> Result<Post, SubmitError> {
    let size = image.decoded_size();
    debug!(
        "compressed payload {}x{} is {}",
        image.width(),
        image.height(),
        format_file_size(size as u64)
    );
    if size > MAX_UPLOAD_BYTES {
        return Err(SubmitError::TooLarge { size });
    }

    let body = NewPost {
        description: description.to_string(),
        image_base64: image.into_data_uri(),
    };
    let post = api.create_post(&body).await?;
    info!("Created post {}", post.id);
    Ok(post)
}
