use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::notifier::NotificationRequest;

/// Validate configuration
/// Currently validates:
/// - Orchestrator limit and timeout are positive when set
/// - Notifier recipient is a valid address when notifications are enabled
/// - Demo image ids are unique
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    config
        .orchestrator
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("orchestrator: {}", e)))?;

    if config.notifier.enabled {
        NotificationRequest::new(config.notifier.recipient.as_str(), "", "")
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("notifier.recipient: {}", e)))?;
    }

    let mut seen = HashSet::new();
    if let Some(dup) = config.demo.image_ids.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(ConfigError::ValidationError(format!(
            "demo.image_ids contains duplicate id {:?}",
            dup
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DemoConfig, NotifierConfig};
    use crate::orchestrator::OrchestratorConfig;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_limit_fails() {
        let config = Config {
            orchestrator: OrchestratorConfig::default().with_concurrency_limit(0),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("concurrency limit"));
    }

    #[test]
    fn test_validate_enabled_notifier_needs_recipient() {
        let config = Config {
            notifier: NotifierConfig {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        let config = Config {
            notifier: NotifierConfig {
                enabled: true,
                recipient: "ops@example.com".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_duplicate_demo_ids() {
        let config = Config {
            demo: DemoConfig {
                image_ids: vec!["img1".to_string(), "img1".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("img1"));
    }
}
