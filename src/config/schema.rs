//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits so an optional TOML file can seed them before
//! environment overrides are applied.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Host probing settings.
    pub probe: ProbeConfig,

    /// Environment and secret snapshot settings.
    pub environment: EnvironmentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    pub listen_addr: String,

    /// Upper bound for serving a single request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Host probing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Target URLs, probed in this order.
    pub hosts: Vec<String>,

    /// Pause between the end of one sweep and the start of the next, in seconds.
    pub period_secs: u64,

    /// Upper bound for probing a single target, in seconds.
    pub timeout_secs: u64,

    /// Number of redirect hops followed before the 3xx response is reported.
    pub max_redirects: usize,

    /// Skip TLS certificate verification for https targets.
    pub accept_invalid_certs: bool,

    /// User-Agent header sent with every probe.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            period_secs: 5,
            timeout_secs: 10,
            max_redirects: 10,
            accept_invalid_certs: false,
            user_agent: concat!("envprobe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Environment snapshot configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Directories walked recursively for secret files.
    pub secrets_dirs: Vec<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Histogram bucket upper bounds for probe latencies, in milliseconds.
    pub histogram_buckets_ms: Vec<f64>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            histogram_buckets_ms: vec![
                1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
            ],
        }
    }
}
