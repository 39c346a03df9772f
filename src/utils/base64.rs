//! Base64 guard for image and palette payloads.
//!
//! The API accepts raw base64 only: no `data:` URL prefix, standard alphabet, canonical
//! padding. A string is accepted exactly when decoding and re-encoding it reproduces it
//! byte for byte.

use crate::{Error, ErrorContext, Result};
use ::base64::engine::general_purpose::STANDARD;
use ::base64::Engine as _;
use std::path::Path;
use tracing::debug;

const DATA_URL_PREFIX: &str = "data:";

/// Strips a leading `data:<mime>;base64,` prefix, returning everything after the first comma.
///
/// Strings without the prefix, or with the prefix but no comma, are returned unchanged.
pub fn strip_data_url_prefix(value: &str) -> &str {
    if value.starts_with(DATA_URL_PREFIX) {
        if let Some(idx) = value.find(',') {
            return &value[idx + 1..];
        }
    }
    value
}

/// Whether `value` is non-empty, unprefixed base64 that survives a decode/encode round trip.
pub fn is_valid_base64(value: &str) -> bool {
    if value.is_empty() || value.starts_with(DATA_URL_PREFIX) {
        return false;
    }
    match STANDARD.decode(value) {
        Ok(bytes) => STANDARD.encode(bytes) == value,
        Err(_) => false,
    }
}

/// Normalizes `value` for the outgoing payload, or fails with a validation error on `field`.
pub fn ensure_valid_base64_image(value: &str, field: &str) -> Result<String> {
    let cleaned = strip_data_url_prefix(value);

    if !is_valid_base64(cleaned) {
        debug!(field, len = value.len(), "rejected base64 image payload");
        return Err(Error::validation_with_context(
            format!(
                "Invalid base64 image format for {}. Must be a valid base64 string without data URL prefix.",
                field
            ),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("base64_guard"),
        ));
    }

    Ok(cleaned.to_string())
}

/// Encodes raw bytes (e.g. a PNG read from disk) as standard base64.
pub fn encode_bytes(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Reads an image file and returns its contents as standard base64.
///
/// A read failure is a configuration error on `input_image`, not a validation error.
pub fn encode_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        Error::configuration_with_context(
            format!("Failed to read image file: {}", e),
            ErrorContext::new()
                .with_field_path("input_image")
                .with_details(path.display().to_string())
                .with_source("image_file"),
        )
    })?;
    Ok(encode_bytes(bytes))
}

/// Decodes a base64 string produced by the provider.
pub(crate) fn decode(value: &str) -> std::result::Result<Vec<u8>, ::base64::DecodeError> {
    STANDARD.decode(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_strip_prefix() {
        let with_prefix = format!("data:image/png;base64,{}", PIXEL_PNG);
        assert_eq!(strip_data_url_prefix(&with_prefix), PIXEL_PNG);
        assert_eq!(strip_data_url_prefix(PIXEL_PNG), PIXEL_PNG);
        // No comma: nothing to strip
        assert_eq!(strip_data_url_prefix("data:abc"), "data:abc");
    }

    #[test]
    fn test_round_trip_acceptance() {
        assert!(is_valid_base64(PIXEL_PNG));
        assert!(is_valid_base64("AAAA"));
        assert!(is_valid_base64(&encode_bytes(b"any bytes at all \x00\xff")));
    }

    #[test]
    fn test_rejections() {
        assert!(!is_valid_base64(""));
        assert!(!is_valid_base64("data:image/png;base64,AAAA"));
        assert!(!is_valid_base64("not base64!"));
        // Missing padding does not survive re-encoding
        assert!(!is_valid_base64("QQ"));
        // Whitespace inside the payload
        assert!(!is_valid_base64("AAAA AAAA"));
    }

    #[test]
    fn test_encoded_bytes_always_round_trip() {
        for len in 0..32usize {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
            let encoded = encode_bytes(&bytes);
            assert_eq!(decode(&encoded).unwrap(), bytes);
            if len > 0 {
                assert!(is_valid_base64(&encoded));
            }
        }
    }

    #[test]
    fn test_ensure_strips_and_returns_normalized() {
        let with_prefix = format!("data:image/png;base64,{}", PIXEL_PNG);
        let cleaned = ensure_valid_base64_image(&with_prefix, "input_image").unwrap();
        assert_eq!(cleaned, PIXEL_PNG);
    }

    #[test]
    fn test_encode_file_read_failure_is_configuration_error() {
        let err = encode_file("/nonexistent/dir/sprite.png").unwrap_err();
        assert_eq!(err.code(), crate::error_code::ErrorCode::Configuration);
        assert_eq!(err.field(), Some("input_image"));
        assert!(err.message().starts_with("Failed to read image file"));
    }

    #[test]
    fn test_encode_file_reads_bytes() {
        let path = std::env::temp_dir().join(format!("rd-encode-{}.bin", std::process::id()));
        std::fs::write(&path, b"\x89PNG").unwrap();
        let encoded = encode_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(encoded, encode_bytes(b"\x89PNG"));
    }

    #[test]
    fn test_ensure_reports_field() {
        let err = ensure_valid_base64_image("%%%", "input_palette").unwrap_err();
        assert_eq!(err.field(), Some("input_palette"));
        assert!(err
            .message()
            .starts_with("Invalid base64 image format for input_palette"));

        let err = ensure_valid_base64_image("", "input_image").unwrap_err();
        assert_eq!(err.field(), Some("input_image"));
    }
}
