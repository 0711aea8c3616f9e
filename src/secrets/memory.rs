//! In-memory secret store backend.
//!
//! Holds a fixed set of secrets in a map. Intended for tests and local
//! development; it is the easiest way to stand up a gateway without any
//! external system.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use super::error::StoreResult;
use super::store::SecretStore;
use super::types::SecretRecord;

/// Fixed-content secret store backend for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    secrets: BTreeMap<String, SecretRecord>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, builder-style.
    pub fn with_secret(mut self, key: impl Into<String>, record: SecretRecord) -> Self {
        self.secrets.insert(key.into(), record);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, record: SecretRecord) {
        self.secrets.insert(key.into(), record);
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn fetch_secret(
        &self,
        key: &str,
        _metadata: &HashMap<String, String>,
    ) -> StoreResult<Option<SecretRecord>> {
        Ok(self.secrets.get(key).cloned())
    }

    async fn fetch_bulk_secrets(
        &self,
        _metadata: &HashMap<String, String>,
    ) -> StoreResult<BTreeMap<String, SecretRecord>> {
        Ok(self.secrets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_present_and_absent_keys() {
        let store = InMemorySecretStore::new()
            .with_secret("db-password", SecretRecord::single("db-password", "hunter2"));
        let metadata = HashMap::new();

        let record = store.fetch_secret("db-password", &metadata).await.unwrap();
        assert_eq!(record.unwrap().get("db-password").unwrap().expose_secret(), "hunter2");

        let record = store.fetch_secret("missing", &metadata).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_bulk_returns_everything() {
        let store = InMemorySecretStore::new()
            .with_secret("a", SecretRecord::single("a", "1"))
            .with_secret("b", SecretRecord::single("b", "2"));

        let data = store.fetch_bulk_secrets(&HashMap::new()).await.unwrap();
        assert_eq!(data.len(), 2);
        assert!(data.contains_key("a"));
        assert!(data.contains_key("b"));
    }

    #[tokio::test]
    async fn test_empty_store_bulk_is_empty() {
        let store = InMemorySecretStore::new();
        assert!(store.is_empty());
        let data = store.fetch_bulk_secrets(&HashMap::new()).await.unwrap();
        assert!(data.is_empty());
    }
}
