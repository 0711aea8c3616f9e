//! Environment variable secret store backend.
//!
//! Reads secrets from environment variables with the `SECRETGATE_SECRET_`
//! prefix. Intended for **development and testing only** - environment
//! variables are visible in process listings, end up in shell history, and
//! offer no encryption at rest. Use a dedicated secrets manager in
//! production.
//!
//! ```bash
//! export SECRETGATE_SECRET_DB_PASSWORD="hunter2"
//! ```
//!
//! A fetch for key `db_password` reads `SECRETGATE_SECRET_DB_PASSWORD`; bulk
//! fetch enumerates every variable carrying the prefix.

use std::collections::{BTreeMap, HashMap};
use std::env;

use async_trait::async_trait;

use super::error::{StoreError, StoreResult};
use super::store::SecretStore;
use super::types::SecretRecord;

/// Environment variable prefix for secrets.
const SECRET_PREFIX: &str = "SECRETGATE_SECRET_";

/// Environment variable secret store (development only).
#[derive(Debug, Clone, Default)]
pub struct EnvVarSecretStore;

impl EnvVarSecretStore {
    pub fn new() -> Self {
        Self
    }

    /// Converts a secret key to its environment variable name, e.g.
    /// `db_password` to `SECRETGATE_SECRET_DB_PASSWORD`.
    fn key_to_env_var(key: &str) -> String {
        format!("{}{}", SECRET_PREFIX, key.to_uppercase())
    }
}

#[async_trait]
impl SecretStore for EnvVarSecretStore {
    async fn fetch_secret(
        &self,
        key: &str,
        _metadata: &HashMap<String, String>,
    ) -> StoreResult<Option<SecretRecord>> {
        let env_var = Self::key_to_env_var(key);
        match env::var(&env_var) {
            Ok(value) => Ok(Some(SecretRecord::single(key, value))),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(StoreError::backend(format!(
                "environment variable '{}' holds invalid unicode",
                env_var
            ))),
        }
    }

    async fn fetch_bulk_secrets(
        &self,
        _metadata: &HashMap<String, String>,
    ) -> StoreResult<BTreeMap<String, SecretRecord>> {
        let mut data = BTreeMap::new();
        for (name, value) in env::vars() {
            if let Some(stripped) = name.strip_prefix(SECRET_PREFIX) {
                let key = stripped.to_lowercase();
                data.insert(key.clone(), SecretRecord::single(key, value));
            }
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_to_env_var() {
        assert_eq!(
            EnvVarSecretStore::key_to_env_var("db_password"),
            "SECRETGATE_SECRET_DB_PASSWORD"
        );
    }

    #[tokio::test]
    async fn test_fetch_secret_from_env() {
        std::env::set_var("SECRETGATE_SECRET_ENV_FETCH_ONE", "env-value");

        let store = EnvVarSecretStore::new();
        let record = store.fetch_secret("env_fetch_one", &HashMap::new()).await.unwrap();
        let record = record.expect("secret should exist");
        assert_eq!(record.get("env_fetch_one").unwrap().expose_secret(), "env-value");

        std::env::remove_var("SECRETGATE_SECRET_ENV_FETCH_ONE");
    }

    #[tokio::test]
    async fn test_absent_key_is_not_an_error() {
        let store = EnvVarSecretStore::new();
        let record = store.fetch_secret("definitely_not_set", &HashMap::new()).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_bulk_fetch_enumerates_prefix() {
        std::env::set_var("SECRETGATE_SECRET_ENV_BULK_A", "1");
        std::env::set_var("SECRETGATE_SECRET_ENV_BULK_B", "2");

        let store = EnvVarSecretStore::new();
        let data = store.fetch_bulk_secrets(&HashMap::new()).await.unwrap();
        assert!(data.contains_key("env_bulk_a"));
        assert!(data.contains_key("env_bulk_b"));

        std::env::remove_var("SECRETGATE_SECRET_ENV_BULK_A");
        std::env::remove_var("SECRETGATE_SECRET_ENV_BULK_B");
    }
}
