//! # Structured Logging
//!
//! Span macros for request tracking using the tracing ecosystem.

/// Create a tracing span for one gateway request.
///
/// Every request gets a fresh `request_id` so retried backend attempts and
/// the final audit event correlate in log output.
///
/// ```rust,ignore
/// let span = secret_span!("get_secret", "vault");
/// let span = secret_span!("get_secret", "vault", key = %key);
/// ```
#[macro_export]
macro_rules! secret_span {
    ($operation:expr, $store:expr) => {
        tracing::info_span!(
            "secret_request",
            operation = %$operation,
            store = %$store,
            request_id = %uuid::Uuid::new_v4()
        )
    };
    ($operation:expr, $store:expr, $($field:tt)*) => {
        tracing::info_span!(
            "secret_request",
            operation = %$operation,
            store = %$store,
            request_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}
