//! The inference namespace.

use super::payload::InferencePayload;
use super::types::{
    AnimationRequest, ImageToImageRequest, InferenceRequest, InferenceResponse, TextToImageRequest,
};
use crate::transport::{ApiRequest, Transport};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Inference endpoint, relative to the base URL.
pub const INFERENCES_PATH: &str = "/inferences";

/// Image and animation generation.
///
/// Every method validates locally first; a request that fails validation never reaches
/// the transport.
#[derive(Clone)]
pub struct Inferences {
    transport: Arc<dyn Transport>,
}

impl Inferences {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Generate images from a text prompt.
    ///
    /// Unset `width`, `height` and `num_images` default to 256, 256 and 1.
    pub async fn text_to_image(&self, request: TextToImageRequest) -> Result<InferenceResponse> {
        self.send(request.finalize()?).await
    }

    /// Transform an existing image with a text prompt. `strength` defaults to 0.8.
    pub async fn image_to_image(&self, request: ImageToImageRequest) -> Result<InferenceResponse> {
        self.send(request.finalize()?).await
    }

    /// Generate a 48x48 four-angle walking sprite animation.
    pub async fn animation(&self, request: AnimationRequest) -> Result<InferenceResponse> {
        self.send(request.finalize()?).await
    }

    /// Run any kind of inference request.
    pub async fn create(&self, request: impl Into<InferenceRequest>) -> Result<InferenceResponse> {
        self.send(request.into().finalize()?).await
    }

    async fn send(&self, payload: InferencePayload) -> Result<InferenceResponse> {
        debug!(
            prompt_style = payload.prompt_style.map(|s| s.as_str()).unwrap_or("default"),
            width = payload.width,
            height = payload.height,
            num_images = payload.num_images,
            "submitting inference"
        );
        let body = serde_json::to_value(&payload)
            .map_err(|e| Error::network(format!("Failed to encode request body: {}", e), None))?;
        let json = self
            .transport
            .request(INFERENCES_PATH, ApiRequest::post(body))
            .await?;
        serde_json::from_value(json).map_err(|e| {
            Error::network(format!("Malformed inference response: {}", e), None)
        })
    }
}
