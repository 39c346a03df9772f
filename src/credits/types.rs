//! Credits types.

use serde::{Deserialize, Serialize};

/// Current credit balance for the API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditsResponse {
    pub credits: f64,
}
