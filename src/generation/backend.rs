//! Backend contract for generative image models.
//!
//! A backend takes a text prompt plus zero or more reference images and
//! answers with at most one image. It is stateless between calls.

use async_trait::async_trait;
use spriteforge_raster::EncodedImage;

use crate::error::ForgeError;

/// One generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Backend model identifier.
    pub model: String,
    /// Text prompt, sent after the references.
    pub prompt: String,
    /// Reference images in order: identity anchor first, motion anchor second.
    pub references: Vec<EncodedImage>,
}

impl ImageRequest {
    /// A text-only request.
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            references: Vec::new(),
        }
    }

    /// Attach a reference image.
    pub fn with_reference(mut self, image: EncodedImage) -> Self {
        self.references.push(image);
        self
    }
}

/// What the backend answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendReply {
    /// First image part of the response.
    Image(EncodedImage),
    /// The response carried no content at all.
    NoContent,
    /// Content was present but none of it was an image.
    NoImage,
}

/// A generative image model.
///
/// Transport failures, HTTP errors and timeouts are reported as
/// [`ForgeError::Generation`].
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Execute one request.
    async fn generate(&self, request: &ImageRequest) -> Result<BackendReply, ForgeError>;
}
