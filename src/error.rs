use crate::error_code::ErrorCode;
use thiserror::Error;

/// Structured error context for local (pre-network) failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field that caused the error (e.g., "prompt", "input_image", "config.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the rejected value)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "validation", "base64_guard")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the Retro Diffusion client.
///
/// Validation and configuration errors are raised locally and never reach the network.
/// The remaining variants are produced once, at the transport boundary, from the HTTP
/// status or the transport failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Insufficient credits: {message}")]
    InsufficientCredits { message: String },

    #[error("Rate limit error: {message}")]
    RateLimit { message: String },

    #[error("Network error: {message}{}", format_status(.status))]
    Network {
        message: String,
        status: Option<u16>,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl Error {
    /// Create a validation error scoped to a request field.
    pub fn validation(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
            context: ErrorContext::new()
                .with_field_path(field)
                .with_source("validation"),
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a network error, optionally carrying the HTTP status that caused it.
    pub fn network(msg: impl Into<String>, status: Option<u16>) -> Self {
        Error::Network {
            message: msg.into(),
            status,
        }
    }

    /// Build the typed error for a non-2xx HTTP response.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorCode::from_http_status(status) {
            ErrorCode::Authentication => Error::Authentication { message },
            ErrorCode::InsufficientCredits => Error::InsufficientCredits { message },
            ErrorCode::RateLimit => Error::RateLimit { message },
            _ => Error::Network {
                message,
                status: Some(status),
            },
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Validation { .. } => ErrorCode::Validation,
            Error::Authentication { .. } => ErrorCode::Authentication,
            Error::InsufficientCredits { .. } => ErrorCode::InsufficientCredits,
            Error::RateLimit { .. } => ErrorCode::RateLimit,
            Error::Network { .. } => ErrorCode::Network,
            Error::Configuration { .. } => ErrorCode::Configuration,
        }
    }

    /// The raw message, without the category prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            Error::Validation { message, .. }
            | Error::Authentication { message }
            | Error::InsufficientCredits { message }
            | Error::RateLimit { message }
            | Error::Network { message, .. }
            | Error::Configuration { message, .. } => message,
        }
    }

    /// Offending field for validation and configuration errors, when known.
    pub fn field(&self) -> Option<&str> {
        self.context().and_then(|c| c.field_path.as_deref())
    }

    /// HTTP status for network errors that came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Network { status, .. } => *status,
            Error::Authentication { .. }
            | Error::InsufficientCredits { .. }
            | Error::RateLimit { .. }
            | Error::Validation { .. }
            | Error::Configuration { .. } => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. } | Error::Configuration { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}
