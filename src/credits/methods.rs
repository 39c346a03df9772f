//! Credits client.

use super::types::CreditsResponse;
use crate::transport::{ApiRequest, Transport};
use crate::{Error, Result};
use std::sync::Arc;

/// Credits endpoint, relative to the base URL.
pub const CREDITS_PATH: &str = "/inferences/credits";

/// Credit balance lookups.
#[derive(Clone)]
pub struct Credits {
    transport: Arc<dyn Transport>,
}

impl Credits {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the remaining credit balance.
    pub async fn get(&self) -> Result<CreditsResponse> {
        let json = self
            .transport
            .request(CREDITS_PATH, ApiRequest::get())
            .await?;
        serde_json::from_value(json)
            .map_err(|e| Error::network(format!("Malformed credits response: {}", e), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedTransport {
        response: serde_json::Value,
        calls: Mutex<Vec<(String, ApiRequest)>>,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn request(&self, path: &str, request: ApiRequest) -> Result<serde_json::Value> {
            self.calls.lock().unwrap().push((path.to_string(), request));
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_get_issues_single_get() {
        let transport = Arc::new(FixedTransport {
            response: serde_json::json!({ "credits": 100 }),
            calls: Mutex::new(Vec::new()),
        });
        let credits = Credits::new(transport.clone());

        let result = tokio_test::block_on(credits.get()).unwrap();
        assert_eq!(result, CreditsResponse { credits: 100.0 });

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/inferences/credits");
        assert_eq!(calls[0].1, ApiRequest::get());
    }

    #[test]
    fn test_malformed_body_is_network_error() {
        let transport = Arc::new(FixedTransport {
            response: serde_json::json!({ "balance": "lots" }),
            calls: Mutex::new(Vec::new()),
        });
        let err = tokio_test::block_on(Credits::new(transport).get()).unwrap_err();
        assert_eq!(err.code(), crate::error_code::ErrorCode::Network);
    }
}
