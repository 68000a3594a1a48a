//! Configuration system for mnemo.

mod env_parser;
mod loader;
mod overrides;
mod paths;
mod validation;

#[cfg(test)]
mod tests_utils;
#[cfg(test)]
use tests_utils::ENV_MUTEX;

use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::Error;
use crate::scoring::DecayMode;

pub use loader::ConfigFile;

/// Which record store backend the engine is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Append-only durable log, readable back on restart.
    Persistent,
    /// Process-lifetime in-memory mapping.
    Transient,
}

impl std::str::FromStr for StorageType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Error> {
        match value.trim() {
            "persistent" => Ok(StorageType::Persistent),
            "transient" => Ok(StorageType::Transient),
            other => Err(Error::Config(format!(
                "Invalid storage type: {other:?} (expected \"persistent\" or \"transient\")"
            ))),
        }
    }
}

/// Engine configuration, read once at construction and immutable after.
///
/// Values are resolved with priority: defaults < config file < env vars.
/// Multiple independently configured engines can coexist in one process;
/// nothing here is read ambiently after construction.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Master switch; a disabled engine turns `remember`/`recall` into
    /// no-ops without touching the store.
    pub enabled: bool,

    /// Record store backend.
    pub storage_type: StorageType,

    /// Path of the persistent record log (ignored for transient storage).
    pub database_path: PathBuf,

    /// Minimum decayed relevance score, 0 to 100, for a record to be
    /// eligible for recall.
    pub similarity_threshold: f64,

    /// Maximum number of records returned per query.
    pub max_context_window: usize,

    /// Per-second relevance falloff; 0 disables decay.
    pub decay_rate: f64,

    /// Whether decay is measured from creation time or last retrieval.
    pub decay_mode: DecayMode,

    /// Upper bound on a single embedding call, in milliseconds.
    /// Unset means unbounded.
    pub embed_timeout_ms: Option<u64>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        // Use home directory with sensible fallback for systems without HOME
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });

        Self {
            enabled: true,
            storage_type: StorageType::Persistent,
            database_path: home.join(".mnemo/memory.jsonl"),
            similarity_threshold: 40.0,
            max_context_window: 5,
            decay_rate: 0.0001,
            decay_mode: DecayMode::Created,
            embed_timeout_ms: None,
        }
    }
}

impl MemoryConfig {
    /// Load configuration with defaults, file values, and environment
    /// overrides, then validate.
    pub fn load() -> Result<Self, Error> {
        let file_config = loader::load_from_file()?;

        let mut config = MemoryConfig::default();

        if let Some(mut file) = file_config {
            if let Some(path) = file.database_path.as_mut() {
                paths::expand_tilde(path);
            }
            config.merge_from_file(file);
        }

        overrides::apply_env_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if let Some(enabled) = file.enabled {
            self.enabled = enabled;
        }
        if let Some(storage_type) = file.storage_type {
            self.storage_type = storage_type;
        }
        if let Some(database_path) = file.database_path {
            self.database_path = database_path;
        }
        if let Some(similarity_threshold) = file.similarity_threshold {
            self.similarity_threshold = similarity_threshold;
        }
        if let Some(max_context_window) = file.max_context_window {
            self.max_context_window = max_context_window;
        }
        if let Some(decay_rate) = file.decay_rate {
            self.decay_rate = decay_rate;
        }
        if let Some(decay_mode) = file.decay_mode {
            self.decay_mode = decay_mode;
        }
        if let Some(embed_timeout_ms) = file.embed_timeout_ms {
            self.embed_timeout_ms = Some(embed_timeout_ms);
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for any out-of-range or non-finite value;
    /// nothing is silently clamped.
    pub fn validate(&self) -> Result<(), Error> {
        let validator = validation::ConfigValidator {
            storage_type: self.storage_type,
            database_path: self.database_path.clone(),
            similarity_threshold: self.similarity_threshold,
            max_context_window: self.max_context_window,
            decay_rate: self.decay_rate,
            embed_timeout_ms: self.embed_timeout_ms,
        };

        validator.validate()
    }

    /// Ensure the parent directory of the record log exists.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!(
                        "Failed to create memory directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}
