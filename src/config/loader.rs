//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{DispatcherConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides the configured deployment environment.
pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Environment(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Environment(e) => write!(f, "{} error: {}", ENVIRONMENT_VAR, e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DispatcherConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<DispatcherConfig, ConfigError> {
    let mut config: DispatcherConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config, std::env::var(ENVIRONMENT_VAR).ok().as_deref())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the `APP_ENVIRONMENT` override, if one is set and non-empty.
pub fn apply_env_overrides(
    config: &mut DispatcherConfig,
    environment: Option<&str>,
) -> Result<(), ConfigError> {
    if let Some(value) = environment.filter(|v| !v.trim().is_empty()) {
        config.environment = value.parse::<Environment>().map_err(ConfigError::Environment)?;
    }
    Ok(())
}
