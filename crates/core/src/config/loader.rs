use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix, e.g. `FANOUT_ORCHESTRATOR__CONCURRENCY_LIMIT=4`
pub const ENV_PREFIX: &str = "FANOUT_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
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
    use crate::config::LogFormat;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_empty() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.demo.image_ids.len(), 5);
        assert_eq!(config.demo.delay_ms, 2000);
    }

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[orchestrator]
concurrency_limit = 2

[logging]
format = "json"

[demo]
image_ids = ["a", "b"]
fail_ids = ["b"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.orchestrator.concurrency_limit, Some(2));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.demo.image_ids, vec!["a", "b"]);
        assert_eq!(config.demo.fail_ids, vec!["b"]);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[orchestrator]
concurrency_limit = "many"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/fanout.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    // Jail holds figment's global lock, so no other test sees FANOUT_ variables
    #[test]
    fn test_load_config_from_file() {
        Jail::expect_with(|_jail| {
            let mut temp_file = NamedTempFile::new().unwrap();
            writeln!(
                temp_file,
                r#"
[orchestrator]
concurrency_limit = 3
unit_timeout_ms = 5000

[notifier]
enabled = true
recipient = "ops@example.com"
"#
            )
            .unwrap();

            let config = load_config(temp_file.path()).unwrap();
            assert_eq!(config.orchestrator.concurrency_limit, Some(3));
            assert_eq!(config.orchestrator.unit_timeout_ms, Some(5000));
            assert!(config.notifier.enabled);
            assert_eq!(config.notifier.recipient, "ops@example.com");
            assert_eq!(config.notifier.sender, "noreply@example.com");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "fanout.toml",
                r#"
[orchestrator]
concurrency_limit = 2

[logging]
filter = "debug"
"#,
            )?;
            jail.set_env("FANOUT_ORCHESTRATOR__CONCURRENCY_LIMIT", "4");
            jail.set_env("FANOUT_NOTIFIER__RECIPIENT", "ops@example.com");

            let config = load_config(Path::new("fanout.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.orchestrator.concurrency_limit, Some(4));
            assert_eq!(config.notifier.recipient, "ops@example.com");
            // Untouched keys keep their file values
            assert_eq!(config.logging.filter, "debug");
            Ok(())
        });
    }
}
