use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Nested keys use a double underscore, e.g. `TICKETFLOW_POLLER__INTERVAL_MS`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("TICKETFLOW_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[backend]
base_url = "https://api.example.com"

[poller]
interval_ms = 2000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.backend.base_url, "https://api.example.com");
        assert_eq!(config.poller.interval_ms, 2000);
        assert_eq!(config.orchestrator.qr_validity_secs, 3600);
    }

    #[test]
    fn test_load_config_from_str_missing_backend() {
        let toml = r#"
[poller]
interval_ms = 5000
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/ticketflow.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[backend]
base_url = "http://127.0.0.1:3000"
timeout_secs = 20

[orchestrator]
recoverable_error_markers = ["CPF", "documento"]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.backend.timeout_secs, Some(20));
        assert_eq!(config.poller.interval_ms, 5000);
        assert_eq!(
            config.orchestrator.recoverable_error_markers,
            vec!["CPF".to_string(), "documento".to_string()]
        );
    }
}
