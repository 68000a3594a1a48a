//! Environment variable overrides for configuration.

use crate::errors::Error;

use super::MemoryConfig;
use super::env_parser;

/// Apply environment variable overrides to a configuration.
pub fn apply_env_overrides(config: &mut MemoryConfig) -> Result<(), Error> {
    env_parser::apply_enabled_override(&mut config.enabled)?;
    env_parser::apply_storage_type_override(&mut config.storage_type)?;
    env_parser::apply_database_path_override(&mut config.database_path)?;
    env_parser::apply_similarity_threshold_override(&mut config.similarity_threshold)?;
    env_parser::apply_max_context_window_override(&mut config.max_context_window)?;
    env_parser::apply_decay_rate_override(&mut config.decay_rate)?;
    env_parser::apply_decay_mode_override(&mut config.decay_mode)?;
    env_parser::apply_embed_timeout_override(&mut config.embed_timeout_ms)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageType;
    use crate::config::tests_utils::{ENV_MUTEX, cleanup_env_vars, set_env_var};
    use std::path::PathBuf;

    #[test]
    fn test_env_vars_override_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        set_env_var("MNEMO_STORAGE_TYPE", "transient");
        set_env_var("MNEMO_DATABASE_PATH", "/custom/memory.jsonl");
        set_env_var("MNEMO_SIMILARITY_THRESHOLD", "55");
        set_env_var("MNEMO_MAX_CONTEXT_WINDOW", "9");

        let mut config = MemoryConfig::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.storage_type, StorageType::Transient);
        assert_eq!(config.database_path, PathBuf::from("/custom/memory.jsonl"));
        assert_eq!(config.similarity_threshold, 55.0);
        assert_eq!(config.max_context_window, 9);

        cleanup_env_vars();
    }

    #[test]
    fn test_enabled_env_var_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        set_env_var("MNEMO_ENABLED", "false");

        let mut config = MemoryConfig::default();
        apply_env_overrides(&mut config).unwrap();

        assert!(!config.enabled);

        cleanup_env_vars();
    }

    #[test]
    fn test_invalid_similarity_threshold_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        set_env_var("MNEMO_SIMILARITY_THRESHOLD", "invalid");

        let mut config = MemoryConfig::default();
        let result = apply_env_overrides(&mut config);

        assert!(matches!(result, Err(Error::Config(_))));

        cleanup_env_vars();
    }

    #[test]
    fn test_invalid_storage_type_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        set_env_var("MNEMO_STORAGE_TYPE", "sqlite");

        let mut config = MemoryConfig::default();
        let result = apply_env_overrides(&mut config);

        assert!(matches!(result, Err(Error::Config(_))));

        cleanup_env_vars();
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        set_env_var("MNEMO_DATABASE_PATH", "");

        let mut config = MemoryConfig::default();
        let result = apply_env_overrides(&mut config);

        assert!(matches!(result, Err(Error::Config(_))));

        cleanup_env_vars();
    }

    #[test]
    fn test_decay_mode_env_var_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        set_env_var("MNEMO_DECAY_MODE", "last_accessed");

        let mut config = MemoryConfig::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.decay_mode, crate::scoring::DecayMode::LastAccessed);

        cleanup_env_vars();
    }

    #[test]
    fn test_embed_timeout_env_var_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        set_env_var("MNEMO_EMBED_TIMEOUT_MS", "2500");

        let mut config = MemoryConfig::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.embed_timeout_ms, Some(2500));

        cleanup_env_vars();
    }
}
