//! Shared helpers.

pub mod base64;

pub use self::base64::{
    encode_bytes, encode_file, ensure_valid_base64_image, is_valid_base64, strip_data_url_prefix,
};
