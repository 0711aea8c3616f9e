//! Secret retrieval domain: scoping, registry, backends, and gateways.
//!
//! The pieces compose leaf-first:
//!
//! - [`scope`] - pure allow/deny evaluation over a per-store
//!   [`ScopeConfig`].
//! - [`store`] - the [`SecretStore`] capability trait every pluggable
//!   backend implements ([`env`] and [`memory`] ship in-tree).
//! - [`registry`] - read-only mapping of store names to backends and
//!   scopes.
//! - [`gateway`] - the policy-gated, resilience-wrapped retrieval
//!   pipelines.
//!
//! # Security
//!
//! Secret values never appear in logs, audit events, or serialized
//! responses; see [`types::SecretString`].

pub mod env;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod registry;
pub mod scope;
pub mod store;
pub mod types;

pub use env::EnvVarSecretStore;
pub use error::{StoreError, StoreResult};
pub use gateway::{DenialReport, SecretsGateway};
pub use memory::InMemorySecretStore;
pub use registry::StoreRegistry;
pub use scope::{evaluate, AccessDecision, AccessReason, DefaultAccess, ScopeConfig};
pub use store::SecretStore;
pub use types::{GetBulkSecretRequest, GetSecretRequest, SecretRecord, SecretString};
