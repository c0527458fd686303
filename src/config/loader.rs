//! Configuration loading: optional TOML file plus environment overrides.

use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// Fatal configuration errors. The gateway must not begin accepting
/// connections if loading or registry construction fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid base URL '{url}' for backend '{backend}': {source}")]
    InvalidUrl {
        backend: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid group '{group}': {reason}")]
    InvalidGroup {
        group: &'static str,
        reason: &'static str,
    },
}

/// Environment variables recognized as overrides, with their defaults
/// supplied by [`GatewayConfig::default`].
const ENV_PORT: &str = "PORT";
const ENV_AUTH_URL: &str = "AUTH_SERVICE_URL";
const ENV_ORDER_URL: &str = "ORDER_SERVICE_URL";
const ENV_RESTAURANT_PRIMARY_URL: &str = "RESTAURANT_PRIMARY_URL";
const ENV_RESTAURANT_REPLICA_URL: &str = "RESTAURANT_REPLICA_URL";
const ENV_UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";

/// Load configuration: defaults, then the TOML file if given, then
/// process environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply environment-style overrides from any key/value source.
///
/// Taking the source as a closure keeps this testable without mutating
/// process-global environment state.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = env(ENV_PORT).and_then(|v| v.parse::<u16>().ok()) {
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Some(url) = env(ENV_AUTH_URL) {
        config.upstreams.auth = url;
    }
    if let Some(url) = env(ENV_ORDER_URL) {
        config.upstreams.orders = url;
    }
    if let Some(url) = env(ENV_RESTAURANT_PRIMARY_URL) {
        config.upstreams.restaurant_primary = url;
    }
    if let Some(url) = env(ENV_RESTAURANT_REPLICA_URL) {
        config.upstreams.restaurant_replica = url;
    }
    if let Some(secs) = env(ENV_UPSTREAM_TIMEOUT_SECS).and_then(|v| v.parse::<u64>().ok()) {
        config.timeouts.upstream_secs = secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fake_env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_resolve_local_topology() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstreams.auth, "http://localhost:4001");
        assert_eq!(config.upstreams.restaurant_replica, "http://localhost:5000");
        assert_eq!(config.timeouts.upstream_secs, 10);
    }

    #[test]
    fn env_overrides_beat_defaults() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            fake_env(&[
                ("PORT", "9999"),
                ("AUTH_SERVICE_URL", "https://auth.internal"),
                ("UPSTREAM_TIMEOUT_SECS", "3"),
            ]),
        );
        assert_eq!(config.listener.bind_address, "0.0.0.0:9999");
        assert_eq!(config.upstreams.auth, "https://auth.internal");
        assert_eq!(config.timeouts.upstream_secs, 3);
        // Untouched keys keep their defaults.
        assert_eq!(config.upstreams.orders, "http://localhost:4002");
    }

    #[test]
    fn malformed_override_is_ignored() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, fake_env(&[("PORT", "not-a-port")]));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn toml_fragment_deserializes_with_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstreams]
            restaurant_primary = "http://10.0.0.5:3001"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstreams.restaurant_primary, "http://10.0.0.5:3001");
        assert_eq!(config.upstreams.auth, "http://localhost:4001");
    }
}
