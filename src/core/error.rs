use std::time::Duration;

use thiserror::Error;

use super::status::EvatrStatus;

/// Boxed error produced by an HTTP transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by eVatR client operations.
///
/// Only [`Error::Api`] originates from the service itself. All other variants
/// are raised locally, before or around the HTTP round trip.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input failed a local check; no request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Client configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport failed to complete the exchange (DNS, connect, TLS, body read).
    #[error("failed to execute request: {0}")]
    Transport(#[source] BoxError),

    /// The round trip did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A 2xx response body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A timestamp field was present but not RFC 3339.
    #[error("invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The service answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// The upstream error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this error was classified from a service response.
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}

/// An error reported by the eVatR service.
///
/// `status` is empty when the response body could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status_code: u16,
    /// eVatR status code (e.g. "evatr-0002").
    pub status: String,
    /// Human-readable message, from the service or a per-status default.
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.status.is_empty() {
            write!(f, "evatr: HTTP {}: {}", self.status_code, self.message)
        } else {
            write!(
                f,
                "evatr: {} (HTTP {}): {}",
                self.status, self.status_code, self.message
            )
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Error with an arbitrary HTTP status.
    pub fn new(status_code: u16, status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            status: status.into(),
            message: message.into(),
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(400, status, message)
    }

    /// 403 Forbidden.
    pub fn forbidden(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(403, status, message)
    }

    /// 404 Not Found.
    pub fn not_found(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(404, status, message)
    }

    /// 500 Internal Server Error.
    pub fn internal_server_error(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(500, status, message)
    }

    /// 503 Service Unavailable.
    pub fn service_unavailable(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(503, status, message)
    }

    /// The status as a known code, if the table has it.
    pub fn known_status(&self) -> Option<EvatrStatus> {
        EvatrStatus::from_code(&self.status)
    }
}
