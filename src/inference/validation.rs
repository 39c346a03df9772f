//! Request validation.
//!
//! [`validate_payload`] runs an ordered chain of pure checks over a finalized payload and
//! stops at the first failure. Every failure is a [`crate::Error::Validation`] naming the
//! offending field. The standalone checks are public so callers can pre-validate user
//! input without building a request.

use super::payload::InferencePayload;
use super::types::PromptStyle;
use crate::utils::base64::is_valid_base64;
use crate::{Error, Result};

/// Sizes accepted for both axes of a standard image.
pub const STANDARD_SIZES: &[u32] = &[64, 128, 256, 512];

/// Sizes accepted for both axes of an animation.
pub const ANIMATION_SIZES: &[u32] = &[48];

pub const MIN_IMAGES: u32 = 1;
pub const MAX_IMAGES: u32 = 10;

type Check = fn(&InferencePayload) -> Result<()>;

/// Order matters: the first failing check is the one reported.
const CHECKS: &[Check] = &[
    check_prompt,
    check_dimensions,
    check_num_images,
    check_strength,
    check_upscale_output_factor,
    check_base64_fields,
];

/// Validates a finalized inference payload.
pub fn validate_payload(payload: &InferencePayload) -> Result<()> {
    CHECKS.iter().try_for_each(|check| check(payload))
}

fn allowed_sizes(is_animation: bool) -> (&'static [u32], &'static str) {
    if is_animation {
        (ANIMATION_SIZES, "animations")
    } else {
        (STANDARD_SIZES, "standard images")
    }
}

fn dimension_error(is_animation: bool, field: &str) -> Error {
    let (sizes, context) = allowed_sizes(is_animation);
    let list = sizes
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Error::validation(
        format!(
            "Invalid dimensions for {}. Supported sizes: {}",
            context, list
        ),
        field,
    )
}

/// Checks a width/height pair against the sizes the provider supports.
///
/// Failures are reported on the `dimensions` field.
pub fn validate_dimensions(width: u32, height: u32, is_animation: bool) -> Result<()> {
    let (sizes, _) = allowed_sizes(is_animation);
    if sizes.contains(&width) && sizes.contains(&height) {
        Ok(())
    } else {
        Err(dimension_error(is_animation, "dimensions"))
    }
}

/// Checks the number of images; animations always produce exactly one.
pub fn validate_num_images(num_images: u32, is_animation: bool) -> Result<()> {
    if is_animation && num_images != 1 {
        return Err(Error::validation(
            "Animations only support generating 1 image at a time",
            "num_images",
        ));
    }
    if !(MIN_IMAGES..=MAX_IMAGES).contains(&num_images) {
        return Err(Error::validation(
            format!(
                "Number of images must be between {} and {}",
                MIN_IMAGES, MAX_IMAGES
            ),
            "num_images",
        ));
    }
    Ok(())
}

/// Checks an image-to-image strength value.
pub fn validate_strength(strength: f64) -> Result<()> {
    if (0.0..=1.0).contains(&strength) {
        Ok(())
    } else {
        Err(Error::validation(
            "Strength must be between 0 and 1",
            "strength",
        ))
    }
}

/// Parses a prompt style name.
pub fn validate_prompt_style(style: &str) -> Result<PromptStyle> {
    style.parse()
}

fn check_prompt(payload: &InferencePayload) -> Result<()> {
    if payload.prompt.is_empty() {
        return Err(Error::validation(
            "Prompt is required and cannot be empty",
            "prompt",
        ));
    }
    Ok(())
}

fn check_dimensions(payload: &InferencePayload) -> Result<()> {
    let is_animation = payload.is_animation();
    match (payload.width, payload.height) {
        (Some(width), Some(height)) => {
            let (sizes, _) = allowed_sizes(is_animation);
            if !sizes.contains(&width) {
                return Err(dimension_error(is_animation, "width"));
            }
            if !sizes.contains(&height) {
                return Err(dimension_error(is_animation, "height"));
            }
            Ok(())
        }
        (Some(0), None) => Err(Error::validation("Width must be positive", "width")),
        (None, Some(0)) => Err(Error::validation("Height must be positive", "height")),
        _ => Ok(()),
    }
}

fn check_num_images(payload: &InferencePayload) -> Result<()> {
    match payload.num_images {
        Some(n) => validate_num_images(n, payload.is_animation()),
        None => Ok(()),
    }
}

fn check_strength(payload: &InferencePayload) -> Result<()> {
    match payload.strength {
        Some(s) => validate_strength(s),
        None => Ok(()),
    }
}

fn check_upscale_output_factor(payload: &InferencePayload) -> Result<()> {
    match payload.upscale_output_factor {
        Some(Some(factor)) if !(factor.is_finite() && factor > 0.0) => Err(Error::validation(
            "Upscale output factor must be a positive number",
            "upscale_output_factor",
        )),
        _ => Ok(()),
    }
}

fn check_base64_fields(payload: &InferencePayload) -> Result<()> {
    let fields = [
        ("input_image", payload.input_image.as_deref()),
        ("input_palette", payload.input_palette.as_deref()),
    ];
    for (field, value) in fields {
        if let Some(v) = value {
            if !is_valid_base64(v) {
                return Err(Error::validation(
                    format!(
                        "Invalid base64 image format for {}. Must be a valid base64 string without data URL prefix.",
                        field
                    ),
                    field,
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(prompt: &str) -> InferencePayload {
        InferencePayload {
            prompt: prompt.to_string(),
            width: Some(256),
            height: Some(256),
            num_images: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_prompt_fails_first() {
        // Bad dimensions too, but the prompt is reported
        let p = InferencePayload {
            width: Some(999),
            height: Some(999),
            ..payload("")
        };
        let err = validate_payload(&p).unwrap_err();
        assert_eq!(err.field(), Some("prompt"));
    }

    #[test]
    fn test_standard_sizes() {
        for w in STANDARD_SIZES {
            for h in STANDARD_SIZES {
                let p = InferencePayload {
                    width: Some(*w),
                    height: Some(*h),
                    ..payload("ok")
                };
                assert!(validate_payload(&p).is_ok(), "{}x{} should pass", w, h);
            }
        }
    }

    #[test]
    fn test_rejects_nonstandard_sizes() {
        for (w, h, field) in [(48, 256, "width"), (256, 100, "height"), (1024, 1024, "width")] {
            let p = InferencePayload {
                width: Some(w),
                height: Some(h),
                ..payload("ok")
            };
            let err = validate_payload(&p).unwrap_err();
            assert_eq!(err.field(), Some(field));
            assert_eq!(
                err.message(),
                "Invalid dimensions for standard images. Supported sizes: 64, 128, 256, 512"
            );
        }
    }

    #[test]
    fn test_animation_only_accepts_48() {
        let ok = InferencePayload {
            width: Some(48),
            height: Some(48),
            prompt_style: Some(PromptStyle::ANIMATION),
            ..payload("walk")
        };
        assert!(validate_payload(&ok).is_ok());

        let bad = InferencePayload {
            width: Some(64),
            height: Some(64),
            ..ok.clone()
        };
        let err = validate_payload(&bad).unwrap_err();
        assert!(err.message().contains("animations"));
        assert!(err.message().ends_with("Supported sizes: 48"));

        let many = InferencePayload {
            num_images: Some(2),
            ..ok
        };
        assert_eq!(validate_payload(&many).unwrap_err().field(), Some("num_images"));
    }

    #[test]
    fn test_num_images_range() {
        assert!(validate_num_images(1, false).is_ok());
        assert!(validate_num_images(10, false).is_ok());
        assert!(validate_num_images(0, false).is_err());
        assert!(validate_num_images(11, false).is_err());
        assert_eq!(
            validate_num_images(3, true).unwrap_err().message(),
            "Animations only support generating 1 image at a time"
        );
    }

    #[test]
    fn test_strength_range() {
        assert!(validate_strength(0.0).is_ok());
        assert!(validate_strength(1.0).is_ok());
        assert!(validate_strength(-0.1).is_err());
        assert!(validate_strength(1.5).is_err());
        assert!(validate_strength(f64::NAN).is_err());

        let p = InferencePayload {
            strength: Some(2.0),
            ..payload("ok")
        };
        assert_eq!(validate_payload(&p).unwrap_err().field(), Some("strength"));
    }

    #[test]
    fn test_upscale_factor() {
        let null = InferencePayload {
            upscale_output_factor: Some(None),
            ..payload("ok")
        };
        assert!(validate_payload(&null).is_ok());

        let zero = InferencePayload {
            upscale_output_factor: Some(Some(0.0)),
            ..payload("ok")
        };
        assert_eq!(
            validate_payload(&zero).unwrap_err().field(),
            Some("upscale_output_factor")
        );
    }

    #[test]
    fn test_prefixed_base64_is_rejected() {
        let p = InferencePayload {
            input_image: Some("data:image/png;base64,AAAA".into()),
            ..payload("ok")
        };
        assert_eq!(validate_payload(&p).unwrap_err().field(), Some("input_image"));
    }

    #[test]
    fn test_standalone_dimensions_field() {
        let err = validate_dimensions(100, 100, false).unwrap_err();
        assert_eq!(err.field(), Some("dimensions"));
        assert!(validate_dimensions(48, 48, true).is_ok());
        assert!(validate_dimensions(64, 64, true).is_err());
    }

    #[test]
    fn test_prompt_style_parse() {
        assert_eq!(
            validate_prompt_style("rd_plus__watercolor").unwrap(),
            PromptStyle::RdPlusWatercolor
        );
        assert!(validate_prompt_style("watercolor").is_err());
    }
}
