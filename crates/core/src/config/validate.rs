use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Backend base URL is http(s)
/// - Payment status endpoint has a `{payment_id}` placeholder
/// - Poll interval is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.backend.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "backend.base_url must be an http(s) URL, got {:?}",
            config.backend.base_url
        )));
    }

    if !config
        .backend
        .endpoints
        .payment_status
        .contains("{payment_id}")
    {
        return Err(ConfigError::ValidationError(
            "backend.endpoints.payment_status must contain {payment_id}".to_string(),
        ));
    }

    if config.poller.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "poller.interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::orchestrator::OrchestratorConfig;
    use crate::poller::PollerConfig;

    fn valid_config() -> Config {
        Config {
            backend: BackendConfig::new("https://api.example.com"),
            poller: PollerConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = valid_config();
        config.backend.base_url = "api.example.com".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_requires_payment_id_placeholder() {
        let mut config = valid_config();
        config.backend.endpoints.payment_status = "/payments/status".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("{payment_id}"));
    }

    #[test]
    fn test_validate_interval_zero_fails() {
        let mut config = valid_config();
        config.poller.interval_ms = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
