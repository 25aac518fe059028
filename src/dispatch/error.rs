//! Dispatch error definitions.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while dispatching a request.
///
/// None of these reach the caller of `Dispatcher::dispatch`; they are logged
/// at the dispatcher boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Required fields missing or malformed; detected before any I/O.
    #[error("Invalid request spec: {0}")]
    InvalidRequestSpec(String),

    /// Either transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Connection, timeout and protocol failures on either transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Target URL could not be parsed or has no host.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The raw socket path only speaks plain HTTP.
    #[error("Unsupported scheme '{0}' for raw socket transport")]
    UnsupportedScheme(String),

    /// TCP connection could not be established.
    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Deadline expired before the operation finished.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Socket write or close failed.
    #[error("Socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error (builder, connect, timeout, body read).
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// The spawned request task panicked or was cancelled.
    #[error("Request task failed: {0}")]
    TaskFailed(String),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DispatchError::InvalidRequestSpec("base_url is required".to_string());
        assert_eq!(err.to_string(), "Invalid request spec: base_url is required");

        let err = DispatchError::from(TransportError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.to_string(), "Request timed out after 30s");

        let err = TransportError::UnsupportedScheme("https".to_string());
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn test_connect_error_keeps_source() {
        let err = TransportError::Connect {
            addr: "127.0.0.1:1".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Connection to 127.0.0.1:1 failed"));
    }
}
