//! ImageGenerator port - the downstream image provider.
//!
//! The engine's job ends at the rendered prompt; the actual provider call
//! is a black box that consumes the prompt text and returns an image handle
//! plus what it cost. Only the interface lives here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::rendering::RenderedPrompt;

/// Reference to a generated image and its cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHandle {
    /// Provider-scoped identifier for the generated image.
    pub image_id: String,
    /// Provider-reported cost of the generation, in USD cents.
    pub cost_cents: u32,
}

/// Port for image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image for the rendered prompt.
    async fn generate(
        &self,
        user_id: &UserId,
        prompt: &RenderedPrompt,
    ) -> Result<ImageHandle, ImageError>;
}

/// Errors from the image provider.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// Provider rejected the request or could not be reached.
    #[error("Image provider unavailable: {0}")]
    Unavailable(String),

    /// Provider refused the prompt content.
    #[error("Image provider rejected prompt: {0}")]
    Rejected(String),
}
