//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file;
//! every field has a default so a minimal config (or none at all) works.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::loader::ConfigError;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Base URLs for the four upstream backends.
    pub upstreams: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Base URLs for each upstream backend.
///
/// Kept as strings at this layer; the registry parses and validates them
/// at startup so a typo is fatal before the listener binds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Dedicated auth service.
    pub auth: String,

    /// Dedicated order service.
    pub orders: String,

    /// Authoritative restaurant/menu service.
    pub restaurant_primary: String,

    /// Read-optimized restaurant/menu replica.
    pub restaurant_replica: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            auth: "http://localhost:4001".to_string(),
            orders: "http://localhost:4002".to_string(),
            restaurant_primary: "http://localhost:3001".to_string(),
            restaurant_replica: "http://localhost:5000".to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Parse one upstream URL, attributing failures to the backend name.
    pub fn parse_url(&self, backend: &'static str, raw: &str) -> Result<Url, ConfigError> {
        Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            backend,
            url: raw.to_string(),
            source,
        })
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-attempt upstream timeout in seconds. A request exceeding this is
    /// a transport failure, eligible for failover.
    pub upstream_secs: u64,

    /// Total inbound request timeout in seconds. Bounds worst-case latency
    /// at roughly two upstream attempts plus overhead.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
