//! Inference module: text-to-image, image-to-image and sprite animation requests,
//! their local validation, and the namespace that sends them.

mod methods;
mod payload;
mod types;
pub mod validation;

pub use methods::{Inferences, INFERENCES_PATH};
pub use payload::{
    InferencePayload, ANIMATION_SIZE, DEFAULT_HEIGHT, DEFAULT_NUM_IMAGES, DEFAULT_STRENGTH,
    DEFAULT_WIDTH,
};
pub use types::{
    AnimationRequest, ImageToImageRequest, InferenceRequest, InferenceResponse, Model,
    PromptStyle, TextToImageRequest,
};
pub use validation::{
    validate_dimensions, validate_num_images, validate_payload, validate_prompt_style,
    validate_strength,
};
