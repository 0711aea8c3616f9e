//! # Secretgate
//!
//! Secretgate is a policy-gated, resilience-wrapped secret retrieval
//! gateway. It sits between callers and a set of pluggable secret store
//! backends, deciding per request and per key whether a caller may see a
//! secret's value, and shielding callers from transient backend failures by
//! routing every backend call through an external resiliency policy runner.
//!
//! ## Architecture
//!
//! ```text
//! caller -> Store Registry -> Scope Evaluator -> Policy Runner -> Backend
//!               |                   |
//!          resolution          audit events        metrics (duration,
//!          failures            on denial           success flag)
//! ```
//!
//! The gateway implements neither secret storage nor retry algorithms:
//! backends implement [`SecretStore`], retry/timeout policy lives behind
//! [`PolicyRunner`], and audit events flow to an [`AuditSink`]. All three
//! are explicit constructor dependencies, so tests assemble isolated
//! gateways with in-memory collaborators.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use secretgate::{
//!     DefaultAccess, GetSecretRequest, InMemorySecretStore, ScopeConfig,
//!     SecretRecord, SecretsGateway, StoreRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> secretgate::Result<()> {
//!     let mut registry = StoreRegistry::new();
//!     registry.register_store(
//!         "local",
//!         Arc::new(InMemorySecretStore::new()
//!             .with_secret("db-password", SecretRecord::single("db-password", "hunter2"))),
//!     );
//!     registry.register_scope(
//!         "local",
//!         ScopeConfig::new(DefaultAccess::Deny).with_allowed(["db-password"]),
//!     );
//!
//!     let gateway = SecretsGateway::new(Arc::new(registry));
//!     let record = gateway.get_secret(GetSecretRequest::new("local", "db-password")).await?;
//!     println!("fields: {}", record.map(|r| r.len()).unwrap_or(0));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod observability;
pub mod resilience;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::GatewayConfig;
pub use errors::{ErrorClass, GatewayError, Result};
pub use observability::{
    init_metrics, init_tracing, AuditEvent, AuditSink, MetricsRecorder, TracingAuditSink,
};
pub use resilience::{DirectRunner, OperationKind, PolicyKey, PolicyRunner};
pub use secrets::{
    evaluate, AccessDecision, AccessReason, DefaultAccess, EnvVarSecretStore,
    GetBulkSecretRequest, GetSecretRequest, InMemorySecretStore, ScopeConfig, SecretRecord,
    SecretStore, SecretString, SecretsGateway, StoreError, StoreRegistry,
};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "secretgate");
    }
}
