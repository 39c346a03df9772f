//! Stable, machine-readable error codes.
//!
//! Every [`crate::Error`] maps to exactly one [`ErrorCode`]. Callers branch on the code
//! (or on the `Error` variant), never on message text.
//!
//! | Code                   | Raised when                                   |
//! |------------------------|-----------------------------------------------|
//! | `VALIDATION_ERROR`     | A request failed local checks before dispatch |
//! | `AUTHENTICATION_ERROR` | HTTP 401 / 403                                |
//! | `INSUFFICIENT_CREDITS` | HTTP 402                                      |
//! | `RATE_LIMIT_ERROR`     | HTTP 429                                      |
//! | `NETWORK_ERROR`        | Any other non-2xx, or a transport failure     |
//! | `CONFIGURATION_ERROR`  | Client construction rejected its config       |
//!
//! ## Example
//!
//! ```rust
//! use retro_diffusion::error_code::ErrorCode;
//!
//! let code = ErrorCode::from_http_status(429);
//! assert_eq!(code.code(), "RATE_LIMIT_ERROR");
//! assert!(code.retryable());
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Local, pre-network request validation failure
    Validation,
    /// Invalid, missing or revoked API key
    Authentication,
    /// Account balance too low for the requested operation
    InsufficientCredits,
    /// Caller exceeded the allowed request rate
    RateLimit,
    /// Unclassified HTTP failure or transport-level failure
    Network,
    /// Client configuration rejected at construction
    Configuration,
}

impl ErrorCode {
    /// Returns the canonical code string (e.g., `"VALIDATION_ERROR"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::InsufficientCredits => "INSUFFICIENT_CREDITS",
            Self::RateLimit => "RATE_LIMIT_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
        }
    }

    /// Returns the error type name (e.g., `"RateLimitError"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Authentication => "AuthenticationError",
            Self::InsufficientCredits => "InsufficientCreditsError",
            Self::RateLimit => "RateLimitError",
            Self::Network => "NetworkError",
            Self::Configuration => "ConfigurationError",
        }
    }

    /// Whether repeating the same call later could succeed.
    ///
    /// Informational only: the client never retries on its own.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network)
    }

    /// Maps a non-2xx HTTP status to its error code.
    ///
    /// 401 and 403 are authentication failures, 402 means the account is out of credits,
    /// 429 is rate limiting, and every other status is a network error.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            402 => Self::InsufficientCredits,
            429 => Self::RateLimit,
            _ => Self::Network,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
