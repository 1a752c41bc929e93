use crate::provider::ProviderError;
use thiserror::Error;

/// Structured error context for configuration and startup failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or field that caused the error (e.g., "TTL_MINUTES")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config", "http_transport")
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

/// Unified error type for the forecast service.
///
/// Variants follow the failure categories the orchestrator distinguishes when
/// shaping a response; see [`Error::status_code`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Forecast not found for date {date}")]
    NotFound { date: String },

    #[error("Forecast provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    #[error("Invalid cache key: key must not be empty")]
    InvalidKey,

    #[error("Malformed cache key '{key}': expected <lat>_<lon>_<date>")]
    MalformedKey { key: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

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

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
        }
    }

    pub fn cache_unavailable(msg: impl Into<String>) -> Self {
        Error::CacheUnavailable {
            message: msg.into(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// HTTP status a request failing with this error is answered with.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation { .. } | Error::Serialization(_) => 400,
            Error::NotFound { .. } => 404,
            Error::Provider(_) => 502,
            Error::CacheUnavailable { .. }
            | Error::InvalidKey
            | Error::MalformedKey { .. }
            | Error::Configuration { .. } => 500,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_formats_context() {
        let err = Error::configuration_with_context(
            "invalid value",
            ErrorContext::new()
                .with_field_path("TTL_MINUTES")
                .with_details("expected a positive integer"),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid value (field: TTL_MINUTES, details: expected a positive integer)"
        );
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("TTL_MINUTES")
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::validation("Missing lat/lon").status_code(), 400);
        assert_eq!(Error::NotFound { date: "2025-07-11".into() }.status_code(), 404);
        assert_eq!(
            Error::Provider(ProviderError::Shape("bad".into())).status_code(),
            502
        );
        assert_eq!(Error::cache_unavailable("down").status_code(), 500);
    }
}
