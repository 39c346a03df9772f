use super::config::ClientConfig;
use super::core::RetroDiffusionClient;
use crate::transport::{HttpTransport, Transport};
use crate::{Error, ErrorContext, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable.
pub struct RetroDiffusionClientBuilder {
    config: ClientConfig,
    headers: HashMap<String, String>,
    transport: Option<Arc<dyn Transport>>,
}

impl RetroDiffusionClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            headers: HashMap::new(),
            transport: None,
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Set the API key. Without one, `RD_TOKEN` then `RD_API_KEY` are consulted.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Override the API base URL (primarily for proxies and testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Per-request timeout, enforced by the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Retry budget (0..=5). Stored on the config; requests are not retried automatically.
    pub fn retries(mut self, retries: u8) -> Self {
        self.config.retries = Some(retries);
        self
    }

    /// Add a header sent with every request.
    ///
    /// Only the built-in HTTP transport sends these; combining them with
    /// [`transport`](Self::transport) fails at `build()`.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Inject a custom transport instead of the default HTTP one.
    ///
    /// Cannot be combined with [`header`](Self::header).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// Fails if the config is invalid or no API key can be found.
    pub fn build(self) -> Result<RetroDiffusionClient> {
        let config = self.config.resolve()?;

        let transport = match self.transport {
            Some(_) if !self.headers.is_empty() => {
                return Err(Error::configuration_with_context(
                    "Extra headers only apply to the built-in HTTP transport; set them on the custom transport instead",
                    ErrorContext::new()
                        .with_field_path("headers")
                        .with_source("client_builder"),
                ));
            }
            Some(t) => t,
            None => Arc::new(HttpTransport::with_headers(&config, &self.headers)?),
        };

        info!(
            base_url = config.base_url(),
            timeout_ms = config.timeout().as_millis() as u64,
            retries = config.retries(),
            "retro-diffusion client ready"
        );

        Ok(RetroDiffusionClient::from_parts(config, transport))
    }
}

impl Default for RetroDiffusionClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
