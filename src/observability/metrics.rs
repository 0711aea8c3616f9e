//! # Metrics Collection
//!
//! Prometheus metrics for outbound secret store calls.

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use crate::errors::{GatewayError, Result};
use crate::resilience::OperationKind;

/// Metrics recorder for outbound secret store telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Record one outbound secret store call.
    ///
    /// Called unconditionally, success or failure, with the elapsed wall
    /// time of the resiliency-wrapped backend invocation.
    pub fn record_store_invocation(
        &self,
        store: &str,
        operation: OperationKind,
        success: bool,
        duration: f64,
    ) {
        let status = if success { "success" } else { "error" };
        let labels = [
            ("store", store.to_string()),
            ("operation", operation.as_str().to_string()),
            ("status", status.to_string()),
        ];
        counter!("secretstore_requests_total", &labels).increment(1);

        let duration_labels =
            [("store", store.to_string()), ("operation", operation.as_str().to_string())];
        histogram!("secretstore_request_duration_seconds", &duration_labels).record(duration);
    }
}

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        "secretstore_requests_total",
        Unit::Count,
        "Total outbound secret store calls by store, operation, and status"
    );
    describe_histogram!(
        "secretstore_request_duration_seconds",
        Unit::Seconds,
        "Duration of resiliency-wrapped secret store calls"
    );
}

/// Install the Prometheus exporter and serve scrapes on `addr`.
///
/// Must run inside a tokio runtime; the exporter spawns its HTTP listener
/// there.
pub fn init_metrics(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| {
            GatewayError::config_with_source(
                format!("failed to install Prometheus exporter on {addr}"),
                Box::new(e),
            )
        })?;
    describe_metrics();
    info!(metrics_addr = %addr, "Prometheus metrics exporter started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_installed_recorder_is_noop() {
        // The metrics macros fall back to a no-op recorder when none is
        // installed, so recording must never panic.
        let recorder = MetricsRecorder::new();
        recorder.record_store_invocation("vault", OperationKind::Get, true, 0.012);
        recorder.record_store_invocation("vault", OperationKind::BulkGet, false, 1.5);
    }

    #[test]
    fn test_describe_without_installed_recorder_is_noop() {
        describe_metrics();
    }
}
