//! Secret store registry.
//!
//! Maps store names to backend instances and to their scoping configuration.
//! The registry is assembled once at startup and read-only afterwards; the
//! gateways receive it as an explicit dependency, so tests can build isolated
//! registries without global state.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::errors::{GatewayError, Result};

use super::scope::ScopeConfig;
use super::store::SecretStore;

/// Registry of named secret store backends and their scope configurations.
pub struct StoreRegistry {
    stores: HashMap<String, Arc<dyn SecretStore>>,
    scopes: HashMap<String, ScopeConfig>,
}

impl std::fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("stores", &self.stores.keys().collect::<Vec<_>>())
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { stores: HashMap::new(), scopes: HashMap::new() }
    }

    /// Register a backend under a store name.
    pub fn register_store(&mut self, name: impl Into<String>, store: Arc<dyn SecretStore>) {
        let name = name.into();
        info!(store = %name, "Registering secret store");
        self.stores.insert(name, store);
    }

    /// Register the scoping configuration for a store name.
    pub fn register_scope(&mut self, name: impl Into<String>, scope: ScopeConfig) {
        self.scopes.insert(name.into(), scope);
    }

    /// Register every scope from a loaded configuration map.
    pub fn register_scopes(&mut self, scopes: HashMap<String, ScopeConfig>) {
        for (name, scope) in scopes {
            self.register_scope(name, scope);
        }
    }

    /// Look up a backend by store name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn SecretStore>> {
        self.stores.get(name).cloned()
    }

    /// Scoping configuration for a store, if one was registered.
    pub fn scope_config(&self, name: &str) -> Option<&ScopeConfig> {
        self.scopes.get(name)
    }

    /// Number of registered backends.
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    pub fn has_store(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Names of every registered backend.
    pub fn registered_stores(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }

    /// Resolve a backend by name.
    ///
    /// Pure lookup with no side effects; the caller is responsible for
    /// logging failures. Distinguishes an unused secrets feature
    /// ([`GatewayError::NoStoresConfigured`]) from a bad store name
    /// ([`GatewayError::StoreNotFound`]).
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn SecretStore>> {
        if self.stores.is_empty() {
            return Err(GatewayError::NoStoresConfigured);
        }
        self.lookup(name).ok_or_else(|| GatewayError::store_not_found(name))
    }
}
