//! Client configuration and API key resolution.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;

/// Production API endpoint.
pub const API_BASE_URL: &str = "https://api.retrodiffusion.ai/v1";

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_ENV_VARS: &[&str] = &["RD_TOKEN", "RD_API_KEY"];

/// Header carrying the API key on every request.
pub const AUTH_HEADER: &str = "X-RD-Token";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const MAX_RETRIES: u8 = 5;

/// Caller-facing configuration. Every field is optional.
///
/// Deserializes from camelCase JSON (`apiKey`, `baseUrl`, `timeout` in milliseconds,
/// `retries`).
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub timeout: Option<Duration>,
    /// Accepted and validated (0..=5). Requests are not retried automatically.
    #[serde(default)]
    pub retries: Option<u8>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish()
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

fn config_error(msg: impl Into<String>, field: &str) -> Error {
    Error::configuration_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(format!("config.{}", field))
            .with_source("client_config"),
    )
}

impl ClientConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid client configuration: {}", e),
                ErrorContext::new().with_source("client_config"),
            )
        })
    }

    /// Check field ranges. Does not look at the environment.
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = &self.api_key {
            if key.is_empty() {
                return Err(config_error("API key is required", "api_key"));
            }
        }

        if let Some(base_url) = &self.base_url {
            let parsed = url::Url::parse(base_url)
                .map_err(|e| config_error(format!("Invalid base URL: {}", e), "base_url"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(config_error(
                    format!("Base URL must use http or https, got {}", parsed.scheme()),
                    "base_url",
                ));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(config_error("Timeout must be positive", "timeout"));
            }
        }

        if let Some(retries) = self.retries {
            if retries > MAX_RETRIES {
                return Err(config_error(
                    format!("Retries must be between 0 and {}", MAX_RETRIES),
                    "retries",
                ));
            }
        }

        Ok(())
    }

    /// Validate and resolve against the process environment.
    pub fn resolve(self) -> Result<ResolvedConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Validate and resolve, reading environment variables through `lookup`.
    pub fn resolve_with<F>(self, lookup: F) -> Result<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.validate()?;

        let api_key = resolve_api_key(self.api_key.as_deref(), lookup).ok_or_else(|| {
            Error::configuration_with_context(
                format!(
                    "API key is required. Provide it via config.api_key or set {} environment variable.",
                    API_KEY_ENV_VARS.join("/")
                ),
                ErrorContext::new()
                    .with_field_path("config.api_key")
                    .with_source("client_config"),
            )
        })?;

        Ok(ResolvedConfig {
            api_key,
            base_url: self
                .base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| API_BASE_URL.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            retries: self.retries.unwrap_or(0),
        })
    }
}

/// Resolve the API key: the explicit value first, then each of [`API_KEY_ENV_VARS`] in order.
/// Empty values are skipped.
pub fn resolve_api_key<F>(explicit: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|k| !k.is_empty())
        .map(String::from)
        .or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .filter_map(|name| lookup(*name))
                .find(|k| !k.is_empty())
        })
}

/// Immutable configuration owned by a constructed client.
#[derive(Clone, PartialEq)]
pub struct ResolvedConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    retries: u8,
}

impl ResolvedConfig {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish()
    }
}
