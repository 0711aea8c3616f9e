//! Error types for secret store backends.
//!
//! Backends report failures with [`StoreError`]; the gateways translate them
//! into the caller-visible taxonomy in [`crate::errors`]. Absence of a secret
//! is not an error: backends return `Ok(None)` (or an empty bulk map) for
//! missing keys.

use thiserror::Error;

/// Result type for backend operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors produced by secret store backends and resiliency runners.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to reach the backend.
    #[error("backend connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The backend rejected our credentials.
    #[error("backend authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A resiliency policy timeout elapsed before the backend answered.
    #[error("operation '{operation}' timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// Backend-specific failure.
    #[error("backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    /// Create a connection failure.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: message.into() }
    }

    /// Create an authentication failure.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed { message: message.into() }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Self::Timeout { operation: operation.into(), duration_ms }
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }

    /// Whether a resiliency policy may usefully retry this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::connection_failed("dial tcp: refused");
        assert_eq!(err.to_string(), "backend connection failed: dial tcp: refused");

        let err = StoreError::timeout("secretstore:vault:get", 500);
        assert!(err.to_string().contains("timed out after 500ms"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::connection_failed("x").is_retryable());
        assert!(StoreError::timeout("op", 100).is_retryable());
        assert!(!StoreError::authentication_failed("x").is_retryable());
        assert!(!StoreError::backend("x").is_retryable());
    }
}
