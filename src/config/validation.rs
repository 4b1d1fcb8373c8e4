//! Semantic configuration checks, separate from serde's syntactic ones.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::EngineConfig;

/// One failed semantic check.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration; collects every failure rather than
/// stopping at the first.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("not a valid socket address: {:?}", config.listener.bind_address),
        });
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError {
            field: "listener.max_connections",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.routing.redirect_on_miss && config.routing.base_url.is_empty() {
        errors.push(ValidationError {
            field: "routing.base_url",
            message: "required when redirect_on_miss is enabled".to_string(),
        });
    }

    if config.database.path.is_empty() {
        errors.push(ValidationError {
            field: "database.path",
            message: "must not be empty".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "not a valid socket address: {:?}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn redirect_without_base_url_is_rejected() {
        let mut config = EngineConfig::default();
        config.routing.redirect_on_miss = true;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "routing.base_url"));
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let mut config = EngineConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        assert!(validate_config(&config).is_err());
    }
}
