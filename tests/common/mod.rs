//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mockito::{Mock, Server, ServerGuard};
use retro_diffusion::transport::{ApiRequest, Transport};
use retro_diffusion::{Error, RetroDiffusionClient};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const TEST_KEY: &str = "rdpk-test-key";

/// In-memory transport that records every call and replays one canned outcome.
pub struct RecordingTransport {
    calls: Mutex<Vec<(String, ApiRequest)>>,
    outcome: Mutex<Option<Result<Value, Error>>>,
}

impl RecordingTransport {
    pub fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Mutex::new(Some(Ok(body))),
        })
    }

    pub fn failing(err: Error) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Mutex::new(Some(Err(err))),
        })
    }

    pub fn calls(&self) -> Vec<(String, ApiRequest)> {
        self.calls.lock().unwrap().clone()
    }

    /// Body of the single recorded call.
    pub fn only_body(&self) -> Value {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one transport call");
        calls[0].1.body.clone().expect("request had no body")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(&self, path: &str, request: ApiRequest) -> retro_diffusion::Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), request));
        self.outcome
            .lock()
            .unwrap()
            .take()
            .expect("transport called more than once")
    }
}

/// Client wired to `transport` with a fixed test key.
pub fn client_with(transport: Arc<RecordingTransport>) -> RetroDiffusionClient {
    RetroDiffusionClient::builder()
        .api_key(TEST_KEY)
        .transport(transport)
        .build()
        .expect("client should build")
}

/// A typical successful inference body.
pub fn inference_body(images: usize) -> Value {
    json!({
        "created_at": 1733425519,
        "credit_cost": 1,
        "base64_images": vec!["iVBORw0KGgo="; images],
        "model": "rd_fast",
        "remaining_credits": 999
    })
}

/// Test fixture that manages a mock HTTP server.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server.
    pub fn client(&self) -> RetroDiffusionClient {
        RetroDiffusionClient::builder()
            .api_key(TEST_KEY)
            .base_url(&self.base_url)
            .build()
            .expect("client should build")
    }

    /// JSON response for `method path`.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: Value) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}
