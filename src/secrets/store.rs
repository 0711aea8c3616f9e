//! Secret store backend trait.
//!
//! Defines the capability interface every pluggable secret store implements.
//! Concrete backends are selected at registry-lookup time by store name; the
//! gateways hold a backend only for the duration of a single request.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use super::error::StoreResult;
use super::types::SecretRecord;

/// Trait for secret store backends.
///
/// Implementations must be `Send + Sync` for use in async contexts, and must
/// be safe for unbounded concurrent invocation; the gateway performs no
/// locking or request coalescing around backend calls.
///
/// Cancellation rides the returned future: when the caller's deadline fires,
/// the in-flight future is dropped and the call is abandoned.
///
/// # Security
///
/// Implementations MUST NOT log secret values.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a single secret by key.
    ///
    /// Returns `Ok(None)` when the backend holds no secret under `key`;
    /// absence is not an error.
    async fn fetch_secret(
        &self,
        key: &str,
        metadata: &HashMap<String, String>,
    ) -> StoreResult<Option<SecretRecord>>;

    /// Fetch every secret the backend will return for this caller.
    ///
    /// An empty map means the backend holds nothing; access filtering happens
    /// in the gateway, after this call returns.
    async fn fetch_bulk_secrets(
        &self,
        metadata: &HashMap<String, String>,
    ) -> StoreResult<BTreeMap<String, SecretRecord>>;
}

impl std::fmt::Debug for dyn SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretStore")
    }
}
