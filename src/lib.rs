//! # retro-diffusion
//!
//! Async client for the Retro Diffusion pixel-art generation API.
//!
//! ## Overview
//!
//! The client wraps two endpoints: `POST /inferences` for image and animation generation
//! and `GET /inferences/credits` for the account balance. Every inference request is
//! filled with defaults and checked locally before it is sent, so invalid dimensions,
//! counts or image payloads fail fast without spending credits.
//!
//! ## Key Features
//!
//! - **Typed requests**: [`TextToImageRequest`], [`ImageToImageRequest`] and [`AnimationRequest`]
//! - **Local validation**: size, count, strength and base64 checks via [`inference::validation`]
//! - **Stable error codes**: every [`Error`] maps to an [`ErrorCode`] string such as `RATE_LIMIT_ERROR`
//! - **Pluggable transport**: swap the HTTP layer through the [`transport::Transport`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use retro_diffusion::{PromptStyle, RetroDiffusionClient, TextToImageRequest};
//!
//! #[tokio::main]
//! async fn main() -> retro_diffusion::Result<()> {
//!     // Reads RD_TOKEN (or RD_API_KEY) from the environment.
//!     let client = RetroDiffusionClient::new()?;
//!
//!     let response = client
//!         .inference()
//!         .text_to_image(
//!             TextToImageRequest::new("a cute corgi wearing a tiny knight helmet")
//!                 .with_size(128, 128)
//!                 .with_style(PromptStyle::RdFastDefault),
//!         )
//!         .await?;
//!
//!     println!("{} image(s), {} credits left", response.base64_images.len(), response.remaining_credits);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client facade, builder and configuration |
//! | [`inference`] | Request types, defaults, validation and the inference namespace |
//! | [`credits`] | Credit balance lookup |
//! | [`transport`] | Transport trait and the reqwest-backed implementation |
//! | [`utils`] | Base64 helpers |

pub mod client;
pub mod credits;
pub mod error_code;
pub mod inference;
pub mod transport;
pub mod utils;

// Re-export main types for convenience
pub use client::{ClientConfig, ResolvedConfig, RetroDiffusionClient, RetroDiffusionClientBuilder};
pub use credits::CreditsResponse;
pub use error_code::ErrorCode;
pub use inference::{
    AnimationRequest, ImageToImageRequest, InferenceRequest, InferenceResponse, Model,
    PromptStyle, TextToImageRequest,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
