//! Request builders: merge defaults, normalize base64 fields, validate.
//!
//! Every inference operation goes through the same pipeline before anything is sent:
//!
//! 1. **Merge** the caller's request with the operation defaults (caller wins). Animations
//!    instead force their fixed size, count and style.
//! 2. **Normalize** `input_image` / `input_palette` through the base64 guard.
//! 3. **Validate** the result with [`validate_payload`].

use super::types::{
    AnimationRequest, ImageToImageRequest, InferenceRequest, PromptStyle, TextToImageRequest,
};
use super::validation::validate_payload;
use crate::utils::base64::ensure_valid_base64_image;
use crate::Result;
use serde::Serialize;

pub const DEFAULT_WIDTH: u32 = 256;
pub const DEFAULT_HEIGHT: u32 = 256;
pub const DEFAULT_NUM_IMAGES: u32 = 1;
pub const DEFAULT_STRENGTH: f64 = 0.8;

/// Fixed animation frame size (both axes).
pub const ANIMATION_SIZE: u32 = 48;

/// The JSON body posted to the inference endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InferencePayload {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_images: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_style: Option<PromptStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_bg: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_y: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_palette: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upscale_output_factor: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_spritesheet: Option<bool>,
}

impl InferencePayload {
    pub fn is_animation(&self) -> bool {
        self.prompt_style
            .map(|s| s.is_animation())
            .unwrap_or(false)
    }

    /// Replaces base64 fields with their prefix-free form.
    fn normalize(mut self) -> Result<Self> {
        if let Some(image) = self.input_image.take() {
            self.input_image = Some(ensure_valid_base64_image(&image, "input_image")?);
        }
        if let Some(palette) = self.input_palette.take() {
            self.input_palette = Some(ensure_valid_base64_image(&palette, "input_palette")?);
        }
        Ok(self)
    }

    fn finalize(self) -> Result<Self> {
        let payload = self.normalize()?;
        validate_payload(&payload)?;
        Ok(payload)
    }
}

impl From<TextToImageRequest> for InferencePayload {
    fn from(req: TextToImageRequest) -> Self {
        Self {
            prompt: req.prompt,
            width: req.width.or(Some(DEFAULT_WIDTH)),
            height: req.height.or(Some(DEFAULT_HEIGHT)),
            num_images: req.num_images.or(Some(DEFAULT_NUM_IMAGES)),
            strength: Some(DEFAULT_STRENGTH),
            seed: req.seed,
            prompt_style: req.prompt_style,
            remove_bg: req.remove_bg,
            tile_x: req.tile_x,
            tile_y: req.tile_y,
            input_palette: req.input_palette,
            upscale_output_factor: req.upscale_output_factor,
            input_image: None,
            return_spritesheet: None,
        }
    }
}

impl From<ImageToImageRequest> for InferencePayload {
    fn from(req: ImageToImageRequest) -> Self {
        Self {
            prompt: req.prompt,
            width: req.width.or(Some(DEFAULT_WIDTH)),
            height: req.height.or(Some(DEFAULT_HEIGHT)),
            num_images: req.num_images.or(Some(DEFAULT_NUM_IMAGES)),
            strength: req.strength.or(Some(DEFAULT_STRENGTH)),
            seed: req.seed,
            prompt_style: req.prompt_style,
            input_image: Some(req.input_image),
            ..Default::default()
        }
    }
}

impl From<AnimationRequest> for InferencePayload {
    fn from(req: AnimationRequest) -> Self {
        Self {
            prompt: req.prompt,
            width: Some(ANIMATION_SIZE),
            height: Some(ANIMATION_SIZE),
            num_images: Some(1),
            prompt_style: Some(PromptStyle::ANIMATION),
            seed: req.seed,
            return_spritesheet: req.return_spritesheet,
            input_image: req.input_image,
            ..Default::default()
        }
    }
}

impl TextToImageRequest {
    /// Builds the exact body that `text_to_image` would send.
    pub fn finalize(self) -> Result<InferencePayload> {
        InferencePayload::from(self).finalize()
    }
}

impl ImageToImageRequest {
    /// Builds the exact body that `image_to_image` would send.
    pub fn finalize(self) -> Result<InferencePayload> {
        InferencePayload::from(self).finalize()
    }
}

impl AnimationRequest {
    /// Builds the exact body that `animation` would send.
    pub fn finalize(self) -> Result<InferencePayload> {
        InferencePayload::from(self).finalize()
    }
}

impl InferenceRequest {
    pub fn finalize(self) -> Result<InferencePayload> {
        match self {
            InferenceRequest::TextToImage(r) => r.finalize(),
            InferenceRequest::ImageToImage(r) => r.finalize(),
            InferenceRequest::Animation(r) => r.finalize(),
        }
    }
}
