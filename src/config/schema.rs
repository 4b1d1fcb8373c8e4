//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML config
//! files, and every field has a default so a minimal config works.

use serde::{Deserialize, Serialize};

/// Root configuration for the engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Routing behavior knobs.
    pub routing: RoutingConfig,

    /// Database location for the SQLite executor.
    pub database: DatabaseConfig,

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

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Routing behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Public base URL of the site.
    pub base_url: String,

    /// Answer a route miss with a redirect to `base_url` instead of a
    /// 404. Off by default; preserved for installations relying on
    /// the legacy behavior.
    pub redirect_on_miss: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            redirect_on_miss: false,
        }
    }
}

/// Database location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path; `:memory:` for an in-memory database.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "gantry.db".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when RUST_LOG is unset.
    pub log_filter: String,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Address the metrics endpoint binds to.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "gantry=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(!config.routing.redirect_on_miss);
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [routing]
            base_url = "https://example.com"
            redirect_on_miss = true

            [database]
            path = ":memory:"
            "#,
        )
        .unwrap();
        assert_eq!(config.routing.base_url, "https://example.com");
        assert!(config.routing.redirect_on_miss);
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.listener.max_connections, 10_000);
    }
}
