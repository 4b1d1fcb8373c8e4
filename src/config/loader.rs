//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::EngineConfig;
use crate::config::validation::validate_config;
use crate::error::{Error, Result};

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;

    let config: EngineConfig =
        toml::from_str(&content).map_err(|e| Error::Config(format!("parse error: {e}")))?;

    validate_config(&config).map_err(|errors| {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Error::Config(format!("validation failed: {joined}"))
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_valid_file() {
        let mut file = tempfile();
        write!(
            file.1,
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"
            "#
        )
        .unwrap();

        let config = load_config(&file.0).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_config(Path::new("/nonexistent/gantry.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn invalid_semantics_are_a_config_error() {
        let mut file = tempfile();
        write!(
            file.1,
            r#"
            [timeouts]
            request_secs = 0
            "#
        )
        .unwrap();

        let err = load_config(&file.0).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("request_secs")));
    }

    fn tempfile() -> (std::path::PathBuf, fs::File) {
        let path = std::env::temp_dir().join(format!(
            "gantry-config-test-{}.toml",
            uuid::Uuid::new_v4()
        ));
        let file = fs::File::create(&path).unwrap();
        (path, file)
    }
}
