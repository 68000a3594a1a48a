//! Configuration file loading and parsing.

use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::Error;
use crate::scoring::DecayMode;

use super::StorageType;

/// Configuration loaded from the TOML file. Every key is optional; keys
/// that are absent fall back to defaults, and keys that are present but
/// unknown or malformed fail the load.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub enabled: Option<bool>,
    pub storage_type: Option<StorageType>,
    pub database_path: Option<PathBuf>,
    pub similarity_threshold: Option<f64>,
    pub max_context_window: Option<usize>,
    pub decay_rate: Option<f64>,
    pub decay_mode: Option<DecayMode>,
    pub embed_timeout_ms: Option<u64>,
}

/// Load configuration from `<config dir>/mnemo/config.toml`.
pub fn load_from_file() -> Result<Option<ConfigFile>, Error> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));

    let config_path = config_dir.join("mnemo/config.toml");

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {e}",
                config_path.display()
            ))
        })?;

        let config: ConfigFile = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {e}",
                config_path.display()
            ))
        })?;

        Ok(Some(config))
    } else {
        Ok(None)
    }
}
