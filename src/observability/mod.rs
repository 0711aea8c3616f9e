//! # Observability
//!
//! Logging, audit, and metrics for the gateway. Audit events and log records
//! are value-free by construction: store names, keys, and decision reasons
//! only.

pub mod audit;
pub mod logging;
pub mod metrics;

pub use audit::{AuditEvent, AuditSink, DenialEntry, RecordingAuditSink, TracingAuditSink};
pub use metrics::{describe_metrics, init_metrics, MetricsRecorder};

use tracing_subscriber::EnvFilter;

use crate::errors::{GatewayError, Result};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies. Fails if a
/// subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = build_env_filter(default_filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| {
            GatewayError::config(format!("failed to initialize tracing subscriber: {e}"))
        })
}

fn build_env_filter(default_filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| {
            GatewayError::config_with_source(
                format!("invalid log filter '{default_filter}'"),
                Box::new(e),
            )
        })
}
