//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TernConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "tern.toml";

/// Loads and validates `tern.toml` from a project directory.
///
/// A directory without a `tern.toml` yields the default configuration.
pub fn load_config(project_dir: &Path) -> Result<TernConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(TernConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<TernConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tern.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TernConfig, ConfigError> {
    let config: TernConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable.
fn validate_config(config: &TernConfig) -> Result<(), ConfigError> {
    if config.parse_cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "parse_cache.capacity must be at least 1".to_string(),
        ));
    }
    if config.log.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "log.filter must not be empty".to_string(),
        ));
    }
    Ok(())
}
