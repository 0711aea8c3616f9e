//! # Configuration Management
//!
//! Environment-driven gateway settings and the secret scopes file loader.
//!
//! Scope configurations live in a YAML document mapping store name to scope,
//! with camelCase fields:
//!
//! ```yaml
//! vault:
//!   defaultAccess: deny
//!   allowedKeys: ["db-password"]
//! legacy-store:
//!   deniedKeys: ["root-token"]
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use crate::errors::{GatewayError, Result};
use crate::secrets::scope::ScopeConfig;

/// Runtime settings for the gateway process.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Whether to install the Prometheus exporter.
    pub enable_metrics: bool,
    /// Scrape address for the Prometheus exporter.
    pub metrics_addr: SocketAddr,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            enable_metrics: false,
            metrics_addr: SocketAddr::from(([127, 0, 0, 1], 9090)),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SECRETGATE_LOG_FILTER` - default tracing filter
    /// - `SECRETGATE_ENABLE_METRICS` - `true`/`1` to enable the exporter
    /// - `SECRETGATE_METRICS_ADDR` - exporter bind address
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let log_filter =
            std::env::var("SECRETGATE_LOG_FILTER").unwrap_or(defaults.log_filter);

        let enable_metrics = match std::env::var("SECRETGATE_ENABLE_METRICS") {
            Ok(value) => matches!(value.as_str(), "1" | "true" | "TRUE"),
            Err(_) => defaults.enable_metrics,
        };

        let metrics_addr = match std::env::var("SECRETGATE_METRICS_ADDR") {
            Ok(value) => value.parse().map_err(|e| {
                GatewayError::config(format!("invalid metrics address '{value}': {e}"))
            })?,
            Err(_) => defaults.metrics_addr,
        };

        Ok(Self { log_filter, enable_metrics, metrics_addr })
    }
}

/// Parse a scopes document mapping store name to [`ScopeConfig`].
pub fn parse_scope_configs(raw: &str) -> Result<HashMap<String, ScopeConfig>> {
    serde_yaml::from_str(raw).map_err(|e| {
        GatewayError::config_with_source(
            "failed parsing secret scopes configuration".to_string(),
            Box::new(e),
        )
    })
}

/// Load a scopes file from disk.
pub fn load_scope_configs(path: &Path) -> Result<HashMap<String, ScopeConfig>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        GatewayError::config_with_source(
            format!("failed reading secret scopes file '{}'", path.display()),
            Box::new(e),
        )
    })?;
    parse_scope_configs(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::scope::DefaultAccess;
    use std::io::Write;

    const SCOPES_YAML: &str = r#"
vault:
  defaultAccess: deny
  allowedKeys: ["db-password"]
legacy-store:
  deniedKeys: ["root-token"]
"#;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.log_filter, "info");
        assert!(!config.enable_metrics);
        assert_eq!(config.metrics_addr.port(), 9090);
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("SECRETGATE_LOG_FILTER", "secretgate=debug");
        std::env::set_var("SECRETGATE_ENABLE_METRICS", "true");
        std::env::set_var("SECRETGATE_METRICS_ADDR", "0.0.0.0:9100");

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.log_filter, "secretgate=debug");
        assert!(config.enable_metrics);
        assert_eq!(config.metrics_addr.port(), 9100);

        std::env::remove_var("SECRETGATE_LOG_FILTER");
        std::env::remove_var("SECRETGATE_ENABLE_METRICS");
        std::env::remove_var("SECRETGATE_METRICS_ADDR");
    }

    #[test]
    fn test_parse_scope_configs() {
        let scopes = parse_scope_configs(SCOPES_YAML).unwrap();
        assert_eq!(scopes.len(), 2);

        let vault = &scopes["vault"];
        assert_eq!(vault.default_access, DefaultAccess::Deny);
        assert!(vault.allowed_keys.contains("db-password"));

        let legacy = &scopes["legacy-store"];
        assert_eq!(legacy.default_access, DefaultAccess::Allow);
        assert!(legacy.denied_keys.contains("root-token"));
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        let err = parse_scope_configs("vault: [not, a, scope]").unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn test_load_scope_configs_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCOPES_YAML.as_bytes()).unwrap();

        let scopes = load_scope_configs(file.path()).unwrap();
        assert!(scopes.contains_key("vault"));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = load_scope_configs(Path::new("/nonexistent/scopes.yaml")).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }
}
