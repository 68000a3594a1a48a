//! Configuration validation logic.

use std::path::PathBuf;

use crate::errors::Error;

use super::StorageType;

/// Largest context window a configuration may request.
const MAX_CONTEXT_WINDOW: usize = 10_000;

/// Validates configuration values.
pub struct ConfigValidator {
    /// Record store backend.
    pub storage_type: StorageType,
    /// Path of the persistent record log.
    pub database_path: PathBuf,
    /// Minimum decayed relevance score for recall.
    pub similarity_threshold: f64,
    /// Maximum number of records returned per query.
    pub max_context_window: usize,
    /// Per-second relevance falloff.
    pub decay_rate: f64,
    /// Upper bound on a single embedding call, in milliseconds.
    pub embed_timeout_ms: Option<u64>,
}

impl ConfigValidator {
    /// Validate all configuration values for correctness and constraints.
    ///
    /// Checks that:
    /// - Similarity threshold is between 0 and 100
    /// - Max context window is at least 1 and within bounds
    /// - Decay rate is non-negative
    /// - Database path is not empty when storage is persistent
    /// - No NaN or infinite values
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any validation check fails.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_similarity_threshold()?;
        self.validate_max_context_window()?;
        self.validate_decay_rate()?;
        self.validate_database_path()?;
        self.validate_embed_timeout()?;

        Ok(())
    }

    fn validate_similarity_threshold(&self) -> Result<(), Error> {
        if self.similarity_threshold.is_nan() || self.similarity_threshold.is_infinite() {
            return Err(Error::Config(
                "Invalid similarity threshold: NaN and infinity are not allowed".into(),
            ));
        }

        if self.similarity_threshold < 0.0 || self.similarity_threshold > 100.0 {
            return Err(Error::Config(format!(
                "Invalid similarity threshold: {} (must be between 0 and 100)",
                self.similarity_threshold
            )));
        }

        Ok(())
    }

    fn validate_max_context_window(&self) -> Result<(), Error> {
        if self.max_context_window == 0 {
            return Err(Error::Config(
                "Invalid max context window: 0 (must be at least 1)".to_string(),
            ));
        }

        if self.max_context_window > MAX_CONTEXT_WINDOW {
            return Err(Error::Config(format!(
                "Invalid max context window: {} exceeds maximum allowed ({})",
                self.max_context_window, MAX_CONTEXT_WINDOW
            )));
        }

        Ok(())
    }

    fn validate_decay_rate(&self) -> Result<(), Error> {
        if self.decay_rate.is_nan() || self.decay_rate.is_infinite() {
            return Err(Error::Config(
                "Invalid decay rate: NaN and infinity are not allowed".into(),
            ));
        }

        if self.decay_rate < 0.0 {
            return Err(Error::Config(format!(
                "Invalid decay rate: {} (must be non-negative)",
                self.decay_rate
            )));
        }

        Ok(())
    }

    fn validate_database_path(&self) -> Result<(), Error> {
        if self.storage_type == StorageType::Persistent
            && self.database_path.as_os_str().is_empty()
        {
            return Err(Error::Config(
                "Database path cannot be empty for persistent storage".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_embed_timeout(&self) -> Result<(), Error> {
        if self.embed_timeout_ms == Some(0) {
            return Err(Error::Config(
                "Invalid embed timeout: 0 ms (leave unset for no bound)".to_string(),
            ));
        }

        Ok(())
    }
}
