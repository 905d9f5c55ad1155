//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::LoggingConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<LoggingConfig, ConfigError> {
    let config: LoggingConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoggingConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogLevel;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            min_level = "warning"
            include_scopes = false

            [categories]
            "db" = "error"
            "http.access" = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.min_level, LogLevel::Warning);
        assert!(!config.include_scopes);
        assert_eq!(config.categories.get("db"), Some(&LogLevel::Error));
        assert_eq!(config.categories.get("http.access"), Some(&LogLevel::Debug));
        assert_eq!(config.memory_capacity, 1024);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), LoggingConfig::default());
    }

    #[test]
    fn test_bad_level_is_parse_error() {
        let err = parse_config(r#"min_level = "loud""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config("memory_capacity = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: memory_capacity must be greater than zero"
        );
    }

    #[test]
    fn test_huge_capacity_is_rejected_before_sink_construction() {
        let err = parse_config("memory_capacity = 9223372036854775807").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert!(matches!(
                errors.as_slice(),
                [ValidationError::CapacityTooLarge { .. }]
            )),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
