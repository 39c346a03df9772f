use super::{ApiRequest, Transport};
use crate::client::config::{ResolvedConfig, AUTH_HEADER};
use crate::client::error_classification::classify_response;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

/// reqwest-backed transport bound to one base URL and API key.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let invalid = |details: String| {
        Error::validation_with_context(
            format!("Invalid header: {}", name),
            ErrorContext::new()
                .with_field_path("headers")
                .with_details(details)
                .with_source("transport"),
        )
    };
    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((name, value))
}

impl HttpTransport {
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        Self::with_headers(config, &HashMap::new())
    }

    /// Build a transport whose requests also carry `extra` headers.
    ///
    /// Extra headers override the JSON content type and auth header; per-request headers
    /// override both.
    pub fn with_headers(config: &ResolvedConfig, extra: &HashMap<String, String>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let (auth_name, auth_value) = header_pair(AUTH_HEADER, config.api_key()).map_err(|_| {
            Error::configuration_with_context(
                "API key contains characters that are not valid in an HTTP header",
                ErrorContext::new()
                    .with_field_path("config.api_key")
                    .with_source("transport"),
            )
        })?;
        default_headers.insert(auth_name, auth_value);
        for (name, value) in extra {
            let (name, value) = header_pair(name, value)?;
            default_headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            default_headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, path: &str, request: ApiRequest) -> Result<serde_json::Value> {
        let url = self.url(path);
        let start = Instant::now();

        let mut headers = self.default_headers.clone();
        for (name, value) in &request.headers {
            let (name, value) = header_pair(name, value)?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                Error::network(format!("Failed to encode request body: {}", e), None)
            })?;
            builder = builder.body(bytes);
        }

        debug!(method = %request.method, path, "retro-diffusion request");

        let response = builder.send().await.map_err(|e| {
            warn!(
                method = %request.method,
                path,
                timeout = e.is_timeout(),
                duration_ms = start.elapsed().as_millis() as u64,
                "retro-diffusion request failed before a response"
            );
            Error::network(format!("Network request failed: {}", e), None)
        })?;

        let status = response.status();
        let body = response.text().await;

        if !status.is_success() {
            // An unreadable error body still classifies by status.
            let body = body.unwrap_or_default();
            let err = classify_response(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                &body,
            );
            warn!(
                method = %request.method,
                path,
                http_status = status.as_u16(),
                error_code = err.code().code(),
                duration_ms = start.elapsed().as_millis() as u64,
                "retro-diffusion request rejected"
            );
            return Err(err);
        }

        let body = body.map_err(|e| {
            Error::network(
                format!("Failed to read response body: {}", e),
                Some(status.as_u16()),
            )
        })?;

        debug!(
            path,
            http_status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "retro-diffusion request succeeded"
        );

        serde_json::from_str(&body).map_err(|e| {
            Error::network(
                format!("Network request failed: malformed JSON response: {}", e),
                Some(status.as_u16()),
            )
        })
    }
}
