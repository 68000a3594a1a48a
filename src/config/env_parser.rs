//! Environment variable parsing utilities for configuration.

use std::path::PathBuf;

use crate::errors::Error;
use crate::scoring::DecayMode;

use super::{StorageType, paths};

/// Parse environment variable as a path, expanding tilde.
fn parse_env_path(name: &str, value: &str) -> Result<PathBuf, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(paths::expand_tilde_path(&PathBuf::from(value)))
}

/// Parse environment variable as an f64.
fn parse_env_float(name: &str, value: &str) -> Result<f64, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Parse environment variable as an unsigned integer.
fn parse_env_u64(name: &str, value: &str) -> Result<u64, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Parse environment variable as a bool ("true"/"false"/"1"/"0").
fn parse_env_bool(name: &str, value: &str) -> Result<bool, Error> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(Error::Config(format!(
            "Invalid {name} value: {other:?} (expected true/false/1/0)"
        ))),
    }
}

/// Apply MNEMO_ENABLED environment variable override.
pub fn apply_enabled_override(enabled: &mut bool) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_ENABLED") {
        *enabled = parse_env_bool("MNEMO_ENABLED", &val)?;
    }
    Ok(())
}

/// Apply MNEMO_STORAGE_TYPE environment variable override.
pub fn apply_storage_type_override(storage_type: &mut StorageType) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_STORAGE_TYPE") {
        *storage_type = val.parse()?;
    }
    Ok(())
}

/// Apply MNEMO_DATABASE_PATH environment variable override.
pub fn apply_database_path_override(database_path: &mut PathBuf) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_DATABASE_PATH") {
        *database_path = parse_env_path("MNEMO_DATABASE_PATH", &val)?;
    }
    Ok(())
}

/// Apply MNEMO_SIMILARITY_THRESHOLD environment variable override.
pub fn apply_similarity_threshold_override(similarity_threshold: &mut f64) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_SIMILARITY_THRESHOLD") {
        *similarity_threshold = parse_env_float("MNEMO_SIMILARITY_THRESHOLD", &val)?;
    }
    Ok(())
}

/// Apply MNEMO_MAX_CONTEXT_WINDOW environment variable override.
pub fn apply_max_context_window_override(max_context_window: &mut usize) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_MAX_CONTEXT_WINDOW") {
        *max_context_window = parse_env_u64("MNEMO_MAX_CONTEXT_WINDOW", &val)? as usize;
    }
    Ok(())
}

/// Apply MNEMO_DECAY_RATE environment variable override.
pub fn apply_decay_rate_override(decay_rate: &mut f64) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_DECAY_RATE") {
        *decay_rate = parse_env_float("MNEMO_DECAY_RATE", &val)?;
    }
    Ok(())
}

/// Apply MNEMO_DECAY_MODE environment variable override.
pub fn apply_decay_mode_override(decay_mode: &mut DecayMode) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_DECAY_MODE") {
        *decay_mode = val.parse()?;
    }
    Ok(())
}

/// Apply MNEMO_EMBED_TIMEOUT_MS environment variable override.
pub fn apply_embed_timeout_override(embed_timeout_ms: &mut Option<u64>) -> Result<(), Error> {
    if let Ok(val) = std::env::var("MNEMO_EMBED_TIMEOUT_MS") {
        *embed_timeout_ms = Some(parse_env_u64("MNEMO_EMBED_TIMEOUT_MS", &val)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_float_invalid() {
        let result = parse_env_float("TEST_FLOAT", "invalid");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_env_float_valid() {
        let result = parse_env_float("TEST_FLOAT", "0.5");
        assert_eq!(result.unwrap(), 0.5);
    }

    #[test]
    fn test_parse_env_bool_values() {
        assert!(parse_env_bool("TEST_BOOL", "true").unwrap());
        assert!(parse_env_bool("TEST_BOOL", "1").unwrap());
        assert!(!parse_env_bool("TEST_BOOL", "false").unwrap());
        assert!(!parse_env_bool("TEST_BOOL", "0").unwrap());
        assert!(parse_env_bool("TEST_BOOL", "yes").is_err());
    }

    #[test]
    fn test_parse_env_u64_rejects_negative() {
        let result = parse_env_u64("TEST_INT", "-3");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_env_path_empty() {
        let result = parse_env_path("TEST_PATH", "  ");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
