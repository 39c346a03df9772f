//! Inference request and response types.

use crate::utils::base64;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generation model family reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    RdFast,
    RdPlus,
}

impl Model {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RdFast => "rd_fast",
            Self::RdPlus => "rd_plus",
        }
    }
}

macro_rules! prompt_styles {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Named visual preset understood by the provider.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PromptStyle {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl PromptStyle {
            /// Every preset, in provider order.
            pub const ALL: &'static [PromptStyle] = &[$(PromptStyle::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(PromptStyle::$variant => $name,)+
                }
            }
        }
    };
}

prompt_styles! {
    RdFastDefault => "rd_fast__default",
    RdFastRetro => "rd_fast__retro",
    RdFastSimple => "rd_fast__simple",
    RdFastDetailed => "rd_fast__detailed",
    RdFastAnime => "rd_fast__anime",
    RdFastGameAsset => "rd_fast__game_asset",
    RdFastPortrait => "rd_fast__portrait",
    RdFastTexture => "rd_fast__texture",
    RdFastUi => "rd_fast__ui",
    RdFastItemSheet => "rd_fast__item_sheet",
    RdFastMcTexture => "rd_fast__mc_texture",
    RdFastMcItem => "rd_fast__mc_item",
    RdFastCharacterTurnaround => "rd_fast__character_turnaround",
    RdFast1Bit => "rd_fast__1_bit",
    RdFastNoStyle => "rd_fast__no_style",
    RdPlusDefault => "rd_plus__default",
    RdPlusRetro => "rd_plus__retro",
    RdPlusWatercolor => "rd_plus__watercolor",
    RdPlusTextured => "rd_plus__textured",
    RdPlusCartoon => "rd_plus__cartoon",
    RdPlusUiElement => "rd_plus__ui_element",
    RdPlusItemSheet => "rd_plus__item_sheet",
    RdPlusCharacterTurnaround => "rd_plus__character_turnaround",
    RdPlusTopdownMap => "rd_plus__topdown_map",
    RdPlusTopdownAsset => "rd_plus__topdown_asset",
    RdPlusIsometric => "rd_plus__isometric",
    RdPlusIsometricAsset => "rd_plus__isometric_asset",
    AnimationFourAngleWalking => "animation__four_angle_walking",
}

impl PromptStyle {
    /// The four-angle walking sprite preset; the only style animations accept.
    pub const ANIMATION: PromptStyle = PromptStyle::AnimationFourAngleWalking;

    pub fn is_animation(&self) -> bool {
        *self == Self::ANIMATION
    }

    /// Model family the preset runs on. Animations run on `rd_fast`.
    pub fn model(&self) -> Model {
        if self.as_str().starts_with("rd_plus__") {
            Model::RdPlus
        } else {
            Model::RdFast
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PromptStyle::ALL
            .iter()
            .copied()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| {
                Error::validation_with_context(
                    format!("Invalid prompt style: {}", s),
                    ErrorContext::new()
                        .with_field_path("prompt_style")
                        .with_source("validation"),
                )
            })
    }
}

/// Text-to-image generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextToImageRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_images: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_style: Option<PromptStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_bg: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_x: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_y: Option<bool>,
    /// Base64 reference palette image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_palette: Option<String>,
    /// `Some(None)` sends an explicit `null` (provider default)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_explicit_null"
    )]
    pub upscale_output_factor: Option<Option<f64>>,
}

impl TextToImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_num_images(mut self, n: u32) -> Self {
        self.num_images = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_style(mut self, style: PromptStyle) -> Self {
        self.prompt_style = Some(style);
        self
    }

    pub fn with_remove_bg(mut self, enable: bool) -> Self {
        self.remove_bg = Some(enable);
        self
    }

    /// Request a seamless texture on both axes.
    pub fn with_tiling(mut self, x: bool, y: bool) -> Self {
        self.tile_x = Some(x);
        self.tile_y = Some(y);
        self
    }

    pub fn with_input_palette(mut self, base64: impl Into<String>) -> Self {
        self.input_palette = Some(base64.into());
        self
    }

    pub fn with_upscale_output_factor(mut self, factor: Option<f64>) -> Self {
        self.upscale_output_factor = Some(factor);
        self
    }
}

/// Image-to-image transformation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageToImageRequest {
    pub prompt: String,
    /// Base64 source image
    pub input_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_images: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_style: Option<PromptStyle>,
    /// 0.0 keeps the source image, 1.0 replaces it. Defaults to 0.8.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

impl ImageToImageRequest {
    pub fn new(prompt: impl Into<String>, input_image: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            input_image: input_image.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_num_images(mut self, n: u32) -> Self {
        self.num_images = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_style(mut self, style: PromptStyle) -> Self {
        self.prompt_style = Some(style);
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }
}

/// Four-angle walking sprite animation request.
///
/// Size, image count and style are fixed by the provider (48x48, one image,
/// `animation__four_angle_walking`) and are not part of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// `true` returns a PNG spritesheet, `false` an animated GIF
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_spritesheet: Option<bool>,
    /// Base64 reference image for the character's appearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_image: Option<String>,
}

impl AnimationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_spritesheet(mut self, enable: bool) -> Self {
        self.return_spritesheet = Some(enable);
        self
    }

    pub fn with_input_image(mut self, base64: impl Into<String>) -> Self {
        self.input_image = Some(base64.into());
        self
    }
}

/// Any inference request, for callers that need a single entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InferenceRequest {
    TextToImage(TextToImageRequest),
    ImageToImage(ImageToImageRequest),
    Animation(AnimationRequest),
}

impl From<TextToImageRequest> for InferenceRequest {
    fn from(r: TextToImageRequest) -> Self {
        Self::TextToImage(r)
    }
}

impl From<ImageToImageRequest> for InferenceRequest {
    fn from(r: ImageToImageRequest) -> Self {
        Self::ImageToImage(r)
    }
}

impl From<AnimationRequest> for InferenceRequest {
    fn from(r: AnimationRequest) -> Self {
        Self::Animation(r)
    }
}

impl TryFrom<serde_json::Value> for InferenceRequest {
    type Error = Error;

    /// Picks the variant from the payload shape: the animation style selects
    /// `Animation`, a present `input_image` selects `ImageToImage`, anything else is
    /// `TextToImage`.
    fn try_from(value: serde_json::Value) -> Result<Self> {
        let is_animation = value.get("prompt_style").and_then(|v| v.as_str())
            == Some(PromptStyle::ANIMATION.as_str());
        let has_input_image = value
            .get("input_image")
            .map(|v| !v.is_null())
            .unwrap_or(false);

        let parsed = if is_animation {
            serde_json::from_value(value).map(InferenceRequest::Animation)
        } else if has_input_image {
            serde_json::from_value(value).map(InferenceRequest::ImageToImage)
        } else {
            serde_json::from_value(value).map(InferenceRequest::TextToImage)
        };

        parsed.map_err(|e| {
            Error::validation_with_context(
                format!("Invalid inference request: {}", e),
                ErrorContext::new().with_source("request_parser"),
            )
        })
    }
}

/// Result of a successful inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Creation timestamp in milliseconds since the epoch
    pub created_at: i64,
    pub credit_cost: f64,
    pub remaining_credits: f64,
    /// Generated images (PNG, or GIF for non-spritesheet animations), base64 encoded
    pub base64_images: Vec<String>,
    pub model: Model,
    /// Fields the provider added that this crate does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl InferenceResponse {
    /// Decodes every returned image to raw bytes.
    pub fn decode_images(&self) -> Result<Vec<Vec<u8>>> {
        self.base64_images
            .iter()
            .enumerate()
            .map(|(i, data)| {
                base64::decode(data).map_err(|e| {
                    Error::network(
                        format!("Malformed image data at base64_images[{}]: {}", i, e),
                        None,
                    )
                })
            })
            .collect()
    }
}

fn deserialize_explicit_null<'de, D>(deserializer: D) -> std::result::Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_style_round_trips_through_str() {
        for style in PromptStyle::ALL {
            assert_eq!(style.as_str().parse::<PromptStyle>().unwrap(), *style);
            assert_eq!(
                serde_json::to_value(style).unwrap(),
                json!(style.as_str())
            );
        }
        assert_eq!(PromptStyle::ALL.len(), 28);
    }

    #[test]
    fn test_unknown_style_is_rejected() {
        let err = "rd_turbo__default".parse::<PromptStyle>().unwrap_err();
        assert_eq!(err.field(), Some("prompt_style"));
    }

    #[test]
    fn test_style_model() {
        assert_eq!(PromptStyle::RdFastRetro.model(), Model::RdFast);
        assert_eq!(PromptStyle::RdPlusIsometric.model(), Model::RdPlus);
        assert!(PromptStyle::ANIMATION.is_animation());
        assert!(!PromptStyle::RdFast1Bit.is_animation());
        assert_eq!(PromptStyle::RdFast1Bit.as_str(), "rd_fast__1_bit");
    }

    #[test]
    fn test_dynamic_request_discrimination() {
        let anim = InferenceRequest::try_from(json!({
            "prompt": "walking mage",
            "prompt_style": "animation__four_angle_walking",
            "width": 48,
            "height": 48
        }))
        .unwrap();
        assert!(matches!(anim, InferenceRequest::Animation(_)));

        let img = InferenceRequest::try_from(json!({
            "prompt": "corgi with a hat",
            "input_image": "AAAA",
            "strength": 0.5
        }))
        .unwrap();
        assert!(matches!(img, InferenceRequest::ImageToImage(ref r) if r.strength == Some(0.5)));

        let txt = InferenceRequest::try_from(json!({
            "prompt": "magic potion",
            "prompt_style": "rd_fast__game_asset"
        }))
        .unwrap();
        assert!(matches!(
            txt,
            InferenceRequest::TextToImage(ref r) if r.prompt_style == Some(PromptStyle::RdFastGameAsset)
        ));
    }

    #[test]
    fn test_dynamic_request_rejects_bad_shape() {
        let err = InferenceRequest::try_from(json!({ "width": 64 })).unwrap_err();
        assert_eq!(err.code(), crate::error_code::ErrorCode::Validation);
    }

    #[test]
    fn test_upscale_null_is_kept() {
        let req: TextToImageRequest =
            serde_json::from_value(json!({ "prompt": "x", "upscale_output_factor": null })).unwrap();
        assert_eq!(req.upscale_output_factor, Some(None));
        let req: TextToImageRequest = serde_json::from_value(json!({ "prompt": "x" })).unwrap();
        assert_eq!(req.upscale_output_factor, None);
    }

    #[test]
    fn test_response_keeps_extra_fields() {
        let resp: InferenceResponse = serde_json::from_value(json!({
            "created_at": 1704067200000i64,
            "credit_cost": 1,
            "remaining_credits": 99,
            "base64_images": ["AAAA"],
            "model": "rd_fast",
            "type": "txt2img"
        }))
        .unwrap();
        assert_eq!(resp.model, Model::RdFast);
        assert_eq!(resp.extra.get("type"), Some(&json!("txt2img")));
        assert_eq!(resp.decode_images().unwrap(), vec![vec![0u8, 0, 0]]);
    }

    #[test]
    fn test_decode_images_reports_malformed_data() {
        let resp = InferenceResponse {
            created_at: 0,
            credit_cost: 1.0,
            remaining_credits: 0.0,
            base64_images: vec!["%%%".into()],
            model: Model::RdPlus,
            extra: Default::default(),
        };
        let err = resp.decode_images().unwrap_err();
        assert_eq!(err.code(), crate::error_code::ErrorCode::Network);
    }
}
