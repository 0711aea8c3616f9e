//! # Error Types
//!
//! Caller-visible error taxonomy for the secret retrieval gateway.
//!
//! Every error maps to an [`ErrorClass`] so transports can translate it into
//! their own status codes without inspecting individual variants. Denial and
//! fetch failures carry only store names, keys, and backend messages - never
//! secret values.

use std::fmt;

/// Custom result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the secret retrieval gateway.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// No secret store backends are registered at all.
    ///
    /// Distinguishes "the secrets feature is unused" from a request naming a
    /// store that simply does not exist.
    #[error("secret store is not configured")]
    NoStoresConfigured,

    /// Backends exist, but none match the requested store name.
    #[error("failed finding secret store with name '{store}'")]
    StoreNotFound { store: String },

    /// The access scope evaluator denied the key.
    ///
    /// Always accompanied by a structured denial audit event; the message
    /// deliberately omits the decision reason and scope details so callers
    /// cannot probe the scoping configuration.
    #[error("access denied by policy to get '{key}' from secret store '{store}'")]
    PermissionDenied { key: String, store: String },

    /// Single-secret fetch failed even after the resiliency policy was
    /// exhausted.
    #[error("failed getting secret with key '{key}' from secret store '{store}': {message}")]
    SecretFetchFailed { key: String, store: String, message: String },

    /// Bulk fetch failed even after the resiliency policy was exhausted.
    #[error("failed getting secrets from secret store '{store}': {message}")]
    BulkSecretFetchFailed { store: String, message: String },

    /// Configuration loading or validation errors.
    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Caller-visible classification of a gateway error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request named a store that cannot be served.
    InvalidArgument,
    /// The access policy denied the request.
    PermissionDenied,
    /// The backend call failed; an expected transient-failure path.
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::PermissionDenied => "permission_denied",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl GatewayError {
    /// Create a store-not-found error.
    pub fn store_not_found(store: impl Into<String>) -> Self {
        Self::StoreNotFound { store: store.into() }
    }

    /// Create a permission-denied error.
    pub fn permission_denied(key: impl Into<String>, store: impl Into<String>) -> Self {
        Self::PermissionDenied { key: key.into(), store: store.into() }
    }

    /// Create a single-secret fetch failure.
    pub fn secret_fetch_failed(
        key: impl Into<String>,
        store: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SecretFetchFailed {
            key: key.into(),
            store: store.into(),
            message: message.into(),
        }
    }

    /// Create a bulk fetch failure.
    pub fn bulk_secret_fetch_failed(
        store: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::BulkSecretFetchFailed { store: store.into(), message: message.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with an underlying source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Classify this error for the caller.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NoStoresConfigured | Self::StoreNotFound { .. } | Self::Config { .. } => {
                ErrorClass::InvalidArgument
            }
            Self::PermissionDenied { .. } => ErrorClass::PermissionDenied,
            Self::SecretFetchFailed { .. } | Self::BulkSecretFetchFailed { .. } => {
                ErrorClass::Internal
            }
        }
    }

    /// HTTP status code for this error, for transports that speak HTTP.
    pub fn status_code(&self) -> u16 {
        match self.class() {
            ErrorClass::InvalidArgument => 400,
            ErrorClass::PermissionDenied => 403,
            ErrorClass::Internal => 500,
        }
    }
}
