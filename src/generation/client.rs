//! Generation client: turns sprite intents into backend requests.

use std::sync::Arc;

use spriteforge_raster::EncodedImage;

use super::backend::{BackendReply, ImageBackend, ImageRequest};
use super::prompt::{PromptVariant, action_prompt, base_prompt};
use crate::error::{ForgeError, Result};
use crate::types::{AnimationState, SpriteConfig};

/// Default backend model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Inputs for one action frame.
#[derive(Debug, Clone, Copy)]
pub struct ActionFrame<'a> {
    /// Identity anchor, sent as the first reference.
    pub base_image: &'a EncodedImage,
    pub config: &'a SpriteConfig,
    pub state: AnimationState,
    /// 1-based position in the animation.
    pub index: usize,
    pub total: usize,
    /// Motion anchor, sent as the second reference when present.
    pub previous_image: Option<&'a EncodedImage>,
}

/// Stateless wrapper over an [`ImageBackend`]. One call, one request.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn ImageBackend>,
    model: String,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .finish()
    }
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn ImageBackend>) -> Self {
        Self {
            backend,
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Use a different backend model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate the base Idle sprite from the config alone.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Generation`] if the backend fails or returns no image.
    pub async fn generate_base(&self, config: &SpriteConfig) -> Result<EncodedImage> {
        let request = ImageRequest::text(&self.model, base_prompt(config));
        tracing::debug!(
            backend = self.backend.name(),
            model = %self.model,
            style = %config.style,
            category = %config.category,
            "requesting base sprite"
        );
        self.execute(&request).await
    }

    /// Generate one action frame anchored on the base image and, if given,
    /// the previous frame of the same animation.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Generation`] if the backend fails or returns no image.
    pub async fn generate_action(&self, frame: ActionFrame<'_>) -> Result<EncodedImage> {
        let variant = PromptVariant::for_motion_anchor(frame.previous_image.is_some());
        let mut request = ImageRequest::text(
            &self.model,
            action_prompt(frame.state, frame.index, frame.total, variant),
        )
        .with_reference(frame.base_image.clone());
        if let Some(previous) = frame.previous_image {
            request = request.with_reference(previous.clone());
        }

        tracing::debug!(
            backend = self.backend.name(),
            model = %self.model,
            state = %frame.state,
            style = %frame.config.style,
            index = frame.index,
            total = frame.total,
            ?variant,
            "requesting action frame"
        );
        self.execute(&request).await
    }

    async fn execute(&self, request: &ImageRequest) -> Result<EncodedImage> {
        match self.backend.generate(request).await? {
            BackendReply::Image(image) => Ok(image),
            BackendReply::NoContent => Err(ForgeError::Generation("No content generated".into())),
            BackendReply::NoImage => Err(ForgeError::Generation(
                "No image data found in response".into(),
            )),
        }
    }
}
