use super::builder::RetroDiffusionClientBuilder;
use super::config::{ClientConfig, ResolvedConfig};
use crate::credits::Credits;
use crate::inference::Inferences;
use crate::transport::Transport;
use crate::Result;
use std::sync::Arc;

/// Entry point for the Retro Diffusion API.
///
/// Holds the resolved configuration and one shared transport. Both namespaces borrow
/// the same transport; nothing is mutated after construction, so the client can be
/// cloned and used from concurrent tasks freely.
#[derive(Clone)]
pub struct RetroDiffusionClient {
    config: Arc<ResolvedConfig>,
    inference: Inferences,
    credits: Credits,
}

impl std::fmt::Debug for RetroDiffusionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetroDiffusionClient")
            .field("config", &self.config)
            .finish()
    }
}

impl RetroDiffusionClient {
    /// Create a client using only the environment (`RD_TOKEN`, then `RD_API_KEY`).
    pub fn new() -> Result<Self> {
        RetroDiffusionClientBuilder::new().build()
    }

    /// Create a client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        RetroDiffusionClientBuilder::from_config(config).build()
    }

    pub fn builder() -> RetroDiffusionClientBuilder {
        RetroDiffusionClientBuilder::new()
    }

    pub(crate) fn from_parts(config: ResolvedConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            inference: Inferences::new(transport.clone()),
            credits: Credits::new(transport),
        }
    }

    /// Image and animation generation.
    pub fn inference(&self) -> &Inferences {
        &self.inference
    }

    /// Credit balance lookups.
    pub fn credits(&self) -> &Credits {
        &self.credits
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }
}
