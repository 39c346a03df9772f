//! Transport layer: one authenticated JSON request, one JSON response.
//!
//! [`HttpTransport`] is the production implementation. The [`Transport`] trait is the seam
//! the namespaces depend on, so tests and custom stacks can substitute their own.

pub mod http;

pub use http::HttpTransport;

use crate::Result;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    /// Extra headers; these override the transport's defaults on conflict.
    pub headers: HashMap<String, String>,
}

impl ApiRequest {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HashMap::new(),
        }
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Sends a request and returns the decoded JSON body.
///
/// Implementations classify failures once: non-2xx statuses become the typed errors from
/// [`crate::Error::from_http_status`], everything else at the transport level becomes
/// [`crate::Error::Network`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, path: &str, request: ApiRequest) -> Result<serde_json::Value>;
}
