//! Resiliency runner interface.
//!
//! The gateway never implements retries, backoff, or circuit breaking
//! itself. It hands each backend call to a [`PolicyRunner`] - an opaque
//! retrying executor selected by a per-store, per-operation-kind
//! [`PolicyKey`] - and treats the outcome as terminal: either a result, or
//! an error after the runner's policy is exhausted.
//!
//! The operation is a `Fn` closure producing a fresh future per attempt, so
//! a runner may re-invoke it as many times as its policy allows. Dropping
//! the runner's future cancels the in-flight attempt, which lets a caller
//! deadline abort retries promptly.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use tracing::trace;

use crate::secrets::error::StoreResult;

/// Kind of outbound secret store operation, used for policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Get,
    BulkGet,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::BulkGet => "bulk_get",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies the outbound policy governing one backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyKey<'a> {
    pub store_name: &'a str,
    pub operation: OperationKind,
}

impl<'a> PolicyKey<'a> {
    pub fn new(store_name: &'a str, operation: OperationKind) -> Self {
        Self { store_name, operation }
    }

    /// Fully qualified policy name, e.g. `secretstore:vault:get`.
    pub fn policy_name(&self) -> String {
        format!("secretstore:{}:{}", self.store_name, self.operation)
    }
}

/// Opaque retry/timeout wrapper around a single backend operation.
///
/// Implementations own the entire retry and timeout policy. The contract the
/// gateway relies on:
///
/// - `operation` may be invoked any number of times, each call producing a
///   fresh attempt.
/// - The returned error is terminal; the gateway performs no further retries.
/// - A runner-imposed timeout surfaces as [`StoreError::Timeout`] without
///   waiting for the backend's own completion.
///
/// [`StoreError::Timeout`]: crate::secrets::error::StoreError::Timeout
#[async_trait]
pub trait PolicyRunner: Send + Sync {
    async fn run<T, F, Fut>(&self, policy: &PolicyKey<'_>, operation: F) -> StoreResult<T>
    where
        T: Send,
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = StoreResult<T>> + Send;
}

/// Pass-through runner: one attempt, no retry, no timeout.
///
/// Used when no resiliency engine is configured; the backend call still goes
/// through the runner seam so a real engine can be swapped in without
/// touching the gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRunner;

#[async_trait]
impl PolicyRunner for DirectRunner {
    async fn run<T, F, Fut>(&self, policy: &PolicyKey<'_>, operation: F) -> StoreResult<T>
    where
        T: Send,
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = StoreResult<T>> + Send,
    {
        trace!(policy = %policy.policy_name(), "Executing backend call without resiliency policy");
        operation().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::error::StoreError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_policy_name() {
        let key = PolicyKey::new("vault", OperationKind::Get);
        assert_eq!(key.policy_name(), "secretstore:vault:get");

        let key = PolicyKey::new("vault", OperationKind::BulkGet);
        assert_eq!(key.policy_name(), "secretstore:vault:bulk_get");
    }

    #[tokio::test]
    async fn test_direct_runner_passes_result_through() {
        let key = PolicyKey::new("local", OperationKind::Get);
        let result = DirectRunner.run(&key, || async { Ok(42u32) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_direct_runner_does_not_retry() {
        let attempts = AtomicUsize::new(0);
        let key = PolicyKey::new("local", OperationKind::Get);

        let result: StoreResult<u32> = DirectRunner
            .run(&key, || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::connection_failed("down")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
