//! Error classification for non-2xx responses.

use crate::Error;

/// Best-effort extraction of the provider's error message.
///
/// Uses the JSON body's `message` field when present, otherwise
/// `HTTP <status>: <reason>`.
pub(crate) fn error_message(status: u16, reason: &str, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| format!("HTTP {}: {}", status, reason))
}

/// Classify a failed response into the typed error the caller sees.
pub(crate) fn classify_response(status: u16, reason: &str, body: &str) -> Error {
    Error::from_http_status(status, error_message(status, reason, body))
}
