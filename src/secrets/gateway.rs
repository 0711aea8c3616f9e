//! Policy-gated secret retrieval gateways.
//!
//! [`SecretsGateway`] sits between callers and the registered secret store
//! backends. Per request it decides, key by key, whether the caller may see
//! a secret, shields the caller from transient backend failures by routing
//! every backend call through a [`PolicyRunner`], and emits an audit event
//! for every denial.
//!
//! Both operations are single-pass, stateless pipelines:
//!
//! ```text
//! get_secret:       resolve -> evaluate -> invoke (runner) -> respond
//! get_bulk_secret:  resolve -> invoke (runner) -> evaluate per key -> respond
//! ```
//!
//! The bulk pipeline invokes the backend *before* filtering because access
//! scope is evaluated against the keys the backend returned, not requested
//! up front. The gateway holds no mutable state and is safe for unbounded
//! concurrent use.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, Instrument};

use crate::errors::{GatewayError, Result};
use crate::observability::audit::{AuditEvent, AuditSink, DenialEntry, TracingAuditSink};
use crate::observability::metrics::MetricsRecorder;
use crate::resilience::{DirectRunner, OperationKind, PolicyKey, PolicyRunner};
use crate::secret_span;

use super::registry::StoreRegistry;
use super::scope::{self, AccessReason};
use super::store::SecretStore;
use super::types::{GetBulkSecretRequest, GetSecretRequest, SecretRecord};

/// Ordered accumulation of (key, reason) pairs denied during one bulk call.
///
/// Transient; exists only to build the aggregate audit event.
#[derive(Debug, Default)]
pub struct DenialReport {
    entries: Vec<DenialEntry>,
}

impl DenialReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, reason: AccessReason) {
        self.entries.push(DenialEntry { key: key.into(), reason });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Denied key names, in collection order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key.clone()).collect()
    }

    pub fn into_entries(self) -> Vec<DenialEntry> {
        self.entries
    }
}

/// Policy-gated, resilience-wrapped secret retrieval gateway.
///
/// Dependencies are explicit constructor parameters: the read-only
/// [`StoreRegistry`] snapshot, the resiliency [`PolicyRunner`], and the
/// [`AuditSink`]. Nothing here is a global, so tests build isolated
/// gateways.
pub struct SecretsGateway<R: PolicyRunner = DirectRunner> {
    registry: Arc<StoreRegistry>,
    runner: R,
    audit: Arc<dyn AuditSink>,
    metrics: MetricsRecorder,
}

impl SecretsGateway<DirectRunner> {
    /// Gateway without a resiliency engine: every backend call is a single
    /// attempt.
    pub fn new(registry: Arc<StoreRegistry>) -> Self {
        Self::with_runner(registry, DirectRunner)
    }
}

impl<R: PolicyRunner> SecretsGateway<R> {
    /// Gateway whose backend calls run through the given resiliency runner.
    pub fn with_runner(registry: Arc<StoreRegistry>, runner: R) -> Self {
        Self {
            registry,
            runner,
            audit: Arc::new(TracingAuditSink::new()),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Replace the audit sink, builder-style.
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Fetch one secret from a named store, subject to its access scope.
    ///
    /// Returns `Ok(None)` when the store resolved and access was granted but
    /// the backend holds nothing under the key.
    pub async fn get_secret(&self, request: GetSecretRequest) -> Result<Option<SecretRecord>> {
        let span = secret_span!("get_secret", &request.store_name, key = %request.key);
        self.get_secret_inner(&request).instrument(span).await
    }

    async fn get_secret_inner(
        &self,
        request: &GetSecretRequest,
    ) -> Result<Option<SecretRecord>> {
        let store = self.resolve_store(&request.store_name)?;

        let scope_config = self.registry.scope_config(&request.store_name);
        let decision = scope::evaluate(scope_config, &request.key);
        if !decision.allowed {
            let event = match scope_config {
                Some(config) => AuditEvent::access_denied(
                    &request.store_name,
                    &request.key,
                    decision.reason,
                    config.clone(),
                ),
                // Unreachable through the evaluator (no configuration always
                // allows); kept so a denial can never go unaudited.
                None => AuditEvent::access_denied_unscoped(&request.store_name, &request.key),
            };
            self.audit.emit(event);
            return Err(GatewayError::permission_denied(&request.key, &request.store_name));
        }

        let policy = PolicyKey::new(&request.store_name, OperationKind::Get);
        let start = Instant::now();
        let result = self
            .runner
            .run(&policy, || store.fetch_secret(&request.key, &request.metadata))
            .await;
        self.metrics.record_store_invocation(
            &request.store_name,
            OperationKind::Get,
            result.is_ok(),
            start.elapsed().as_secs_f64(),
        );

        match result {
            Ok(record) => Ok(record),
            Err(source) => {
                let err = GatewayError::secret_fetch_failed(
                    &request.key,
                    &request.store_name,
                    source.to_string(),
                );
                // Expected operational failure mode, so debug rather than info.
                debug!(error = %err, "Secret fetch failed after resiliency policy");
                Err(err)
            }
        }
    }

    /// Fetch every secret a store will return, filtered by its access scope.
    ///
    /// Returns `Ok(None)` when the backend returned no keys at all, and
    /// `Ok(Some(empty))` when it returned keys but every one was denied.
    pub async fn get_bulk_secret(
        &self,
        request: GetBulkSecretRequest,
    ) -> Result<Option<BTreeMap<String, SecretRecord>>> {
        let span = secret_span!("get_bulk_secret", &request.store_name);
        self.get_bulk_secret_inner(&request).instrument(span).await
    }

    async fn get_bulk_secret_inner(
        &self,
        request: &GetBulkSecretRequest,
    ) -> Result<Option<BTreeMap<String, SecretRecord>>> {
        let store = self.resolve_store(&request.store_name)?;

        let policy = PolicyKey::new(&request.store_name, OperationKind::BulkGet);
        let start = Instant::now();
        let result = self
            .runner
            .run(&policy, || store.fetch_bulk_secrets(&request.metadata))
            .await;
        self.metrics.record_store_invocation(
            &request.store_name,
            OperationKind::BulkGet,
            result.is_ok(),
            start.elapsed().as_secs_f64(),
        );

        let data = match result {
            Ok(data) => data,
            Err(source) => {
                let err = GatewayError::bulk_secret_fetch_failed(
                    &request.store_name,
                    source.to_string(),
                );
                debug!(error = %err, "Bulk secret fetch failed after resiliency policy");
                return Err(err);
            }
        };

        if data.is_empty() {
            return Ok(None);
        }

        let scope_config = self.registry.scope_config(&request.store_name);
        let mut allowed = BTreeMap::new();
        let mut report = DenialReport::new();
        for (key, record) in data {
            let decision = scope::evaluate(scope_config, &key);
            if decision.allowed {
                allowed.insert(key, record);
            } else {
                debug!(
                    key = %key,
                    reason = %decision.reason,
                    "Secret excluded from bulk response"
                );
                report.push(key, decision.reason);
            }
        }

        if !report.is_empty() {
            let event = match scope_config {
                Some(config) => AuditEvent::bulk_access_denied(
                    &request.store_name,
                    config.default_access,
                    report.into_entries(),
                ),
                // Defensive; see the note in get_secret_inner.
                None => AuditEvent::bulk_access_denied_unscoped(
                    &request.store_name,
                    report.keys(),
                ),
            };
            self.audit.emit(event);
        }

        Ok(Some(allowed))
    }

    fn resolve_store(&self, store_name: &str) -> Result<Arc<dyn SecretStore>> {
        self.registry.resolve(store_name).map_err(|err| {
            debug!(error = %err, store = %store_name, "Secret store resolution failed");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::audit::RecordingAuditSink;
    use crate::secrets::memory::InMemorySecretStore;
    use crate::secrets::scope::{DefaultAccess, ScopeConfig};

    fn registry_with_store(scope: Option<ScopeConfig>) -> Arc<StoreRegistry> {
        let store = InMemorySecretStore::new()
            .with_secret("allowed-key", SecretRecord::single("allowed-key", "open"))
            .with_secret("denied-key", SecretRecord::single("denied-key", "shut"));
        let mut registry = StoreRegistry::new();
        registry.register_store("local", Arc::new(store));
        if let Some(scope) = scope {
            registry.register_scope("local", scope);
        }
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_get_secret_without_scope_is_open() {
        let gateway = SecretsGateway::new(registry_with_store(None));

        let record = gateway
            .get_secret(GetSecretRequest::new("local", "allowed-key"))
            .await
            .unwrap()
            .expect("record should exist");
        assert_eq!(record.get("allowed-key").unwrap().expose_secret(), "open");
    }

    #[tokio::test]
    async fn test_get_secret_denied_emits_single_audit_event() {
        let scope = ScopeConfig::new(DefaultAccess::Allow).with_denied(["denied-key"]);
        let sink = Arc::new(RecordingAuditSink::new());
        let gateway = SecretsGateway::new(registry_with_store(Some(scope.clone())))
            .with_audit_sink(sink.clone());

        let err = gateway
            .get_secret(GetSecretRequest::new("local", "denied-key"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::PermissionDenied { .. }));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            AuditEvent::AccessDenied { store, key, reason, scope: event_scope, .. } => {
                assert_eq!(store, "local");
                assert_eq!(key, "denied-key");
                assert_eq!(*reason, AccessReason::DeniedListMatch);
                assert_eq!(event_scope, &scope);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_secret_absent_key_yields_none() {
        let gateway = SecretsGateway::new(registry_with_store(None));

        let record = gateway
            .get_secret(GetSecretRequest::new("local", "no-such-key"))
            .await
            .unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_bulk_filters_denied_keys_and_audits_once() {
        let scope = ScopeConfig::new(DefaultAccess::Allow).with_denied(["denied-key"]);
        let sink = Arc::new(RecordingAuditSink::new());
        let gateway = SecretsGateway::new(registry_with_store(Some(scope)))
            .with_audit_sink(sink.clone());

        let data = gateway
            .get_bulk_secret(GetBulkSecretRequest::new("local"))
            .await
            .unwrap()
            .expect("backend returned keys");

        assert!(data.contains_key("allowed-key"));
        assert!(!data.contains_key("denied-key"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            AuditEvent::BulkAccessDenied { store, default_access, denials, .. } => {
                assert_eq!(store, "local");
                assert_eq!(*default_access, DefaultAccess::Allow);
                assert_eq!(denials.len(), 1);
                assert_eq!(denials[0].key, "denied-key");
                assert_eq!(denials[0].reason, AccessReason::DeniedListMatch);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bulk_fully_denied_is_empty_not_absent() {
        let scope = ScopeConfig::new(DefaultAccess::Deny);
        let gateway = SecretsGateway::new(registry_with_store(Some(scope)));

        let data = gateway
            .get_bulk_secret(GetBulkSecretRequest::new("local"))
            .await
            .unwrap()
            .expect("backend returned keys, response must be present");
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_empty_backend_is_absent() {
        let mut registry = StoreRegistry::new();
        registry.register_store("empty", Arc::new(InMemorySecretStore::new()));
        let gateway = SecretsGateway::new(Arc::new(registry));

        let data = gateway.get_bulk_secret(GetBulkSecretRequest::new("empty")).await.unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_resolution_errors_propagate_unchanged() {
        let gateway = SecretsGateway::new(Arc::new(StoreRegistry::new()));
        let err = gateway
            .get_secret(GetSecretRequest::new("any", "key"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NoStoresConfigured));

        let gateway = SecretsGateway::new(registry_with_store(None));
        let err = gateway
            .get_bulk_secret(GetBulkSecretRequest::new("unknown"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::StoreNotFound { .. }));
    }

    #[test]
    fn test_denial_report_preserves_order() {
        let mut report = DenialReport::new();
        report.push("b", AccessReason::DeniedListMatch);
        report.push("a", AccessReason::NotInAllowedList);

        assert_eq!(report.len(), 2);
        assert_eq!(report.keys(), vec!["b".to_string(), "a".to_string()]);

        let entries = report.into_entries();
        assert_eq!(entries[0].key, "b");
        assert_eq!(entries[1].key, "a");
    }
}
