//! Client facade for the Retro Diffusion API.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod config;
pub mod core;
pub(crate) mod error_classification;

pub use builder::RetroDiffusionClientBuilder;
pub use config::{resolve_api_key, ClientConfig, ResolvedConfig, API_BASE_URL, API_KEY_ENV_VARS};
pub use self::core::RetroDiffusionClient;
