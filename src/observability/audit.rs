//! Audit events for access decisions.
//!
//! Every denial produces a structured, value-free [`AuditEvent`]: store
//! names, keys, decision reasons, and scope configuration may appear in an
//! event - secret values never do. Emission is fire-and-forget through an
//! [`AuditSink`], decoupled from the pure decision function so the evaluator
//! stays independently testable.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::secrets::scope::{AccessReason, DefaultAccess, ScopeConfig};

/// One denied key with its decision reason, as collected during bulk
/// filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialEntry {
    pub key: String,
    pub reason: AccessReason,
}

/// Structured audit record describing an access denial.
///
/// The `Unscoped` variants cover denials on stores with no scoping
/// configuration. Under the documented precedence a missing configuration
/// always allows, so these branches are defensive and not reachable through
/// the evaluator; they exist so a future precedence change cannot silently
/// drop audit coverage.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A single-secret request was denied.
    AccessDenied {
        timestamp: DateTime<Utc>,
        store: String,
        key: String,
        reason: AccessReason,
        /// Full scoping configuration in force at decision time. Contains
        /// key names only, never values.
        scope: ScopeConfig,
    },

    /// A single-secret request was denied on a store without configuration.
    AccessDeniedUnscoped {
        timestamp: DateTime<Utc>,
        store: String,
        key: String,
    },

    /// One or more keys were filtered out of a bulk response.
    BulkAccessDenied {
        timestamp: DateTime<Utc>,
        store: String,
        default_access: DefaultAccess,
        /// Denied keys in backend iteration order, each with its reason.
        denials: Vec<DenialEntry>,
    },

    /// Bulk keys were filtered on a store without configuration; reasons are
    /// unavailable by definition.
    BulkAccessDeniedUnscoped {
        timestamp: DateTime<Utc>,
        store: String,
        keys: Vec<String>,
    },
}

impl AuditEvent {
    pub fn access_denied(
        store: impl Into<String>,
        key: impl Into<String>,
        reason: AccessReason,
        scope: ScopeConfig,
    ) -> Self {
        Self::AccessDenied {
            timestamp: Utc::now(),
            store: store.into(),
            key: key.into(),
            reason,
            scope,
        }
    }

    pub fn access_denied_unscoped(store: impl Into<String>, key: impl Into<String>) -> Self {
        Self::AccessDeniedUnscoped {
            timestamp: Utc::now(),
            store: store.into(),
            key: key.into(),
        }
    }

    pub fn bulk_access_denied(
        store: impl Into<String>,
        default_access: DefaultAccess,
        denials: Vec<DenialEntry>,
    ) -> Self {
        Self::BulkAccessDenied {
            timestamp: Utc::now(),
            store: store.into(),
            default_access,
            denials,
        }
    }

    pub fn bulk_access_denied_unscoped(store: impl Into<String>, keys: Vec<String>) -> Self {
        Self::BulkAccessDeniedUnscoped { timestamp: Utc::now(), store: store.into(), keys }
    }

    /// Store name this event concerns.
    pub fn store(&self) -> &str {
        match self {
            Self::AccessDenied { store, .. }
            | Self::AccessDeniedUnscoped { store, .. }
            | Self::BulkAccessDenied { store, .. }
            | Self::BulkAccessDeniedUnscoped { store, .. } => store,
        }
    }
}

/// Sink for audit events.
///
/// `emit` must not block; the gateway calls it inline on the request path.
pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

/// Audit sink that writes events as structured `tracing` records.
///
/// Denials are operationally interesting but expected, so they log at info;
/// nothing here ever reaches a secret value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        match &event {
            AuditEvent::AccessDenied { store, key, reason, scope, .. } => {
                info!(
                    store = %store,
                    key = %key,
                    reason = %reason,
                    default_access = %scope.default_access,
                    allowed_keys = ?scope.allowed_keys,
                    denied_keys = ?scope.denied_keys,
                    "Secret access denied"
                );
            }
            AuditEvent::AccessDeniedUnscoped { store, key, .. } => {
                info!(
                    store = %store,
                    key = %key,
                    "Secret access denied, no scoping configuration found"
                );
            }
            AuditEvent::BulkAccessDenied { store, default_access, denials, .. } => {
                info!(
                    store = %store,
                    default_access = %default_access,
                    denials = ?denials,
                    "Some secrets were denied access"
                );
            }
            AuditEvent::BulkAccessDeniedUnscoped { store, keys, .. } => {
                info!(
                    store = %store,
                    denied_keys = ?keys,
                    "Some secrets were denied access, no scoping configuration found"
                );
            }
        }
    }
}

/// Audit sink that records events in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event emitted so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit sink lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("audit sink lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for RecordingAuditSink {
    fn emit(&self, event: AuditEvent) {
        self.events.lock().expect("audit sink lock poisoned").push(event);
    }
}
