use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::types::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Parse a TOML document into a [`Config`]. Missing tables and keys keep
/// their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load a [`Config`] from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    debug!("Loaded KatScan config from {}", path.display());
    Ok(config)
}

/// Render a [`Config`] as TOML, e.g. to seed a config file.
pub fn to_toml(config: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string(config)?)
}
