//! Shared test utilities for config module tests.

use std::sync::Mutex;

/// Mutex to serialize environment variable tests and prevent race conditions.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Set an environment variable from a test holding [`ENV_MUTEX`].
pub fn set_env_var(name: &str, value: &str) {
    // SAFETY: env-mutating tests serialize on ENV_MUTEX, so no other
    // thread reads or writes the environment concurrently.
    unsafe { std::env::set_var(name, value) };
}

/// Clean up environment variables used by mnemo config.
pub fn cleanup_env_vars() {
    let vars = [
        "MNEMO_ENABLED",
        "MNEMO_STORAGE_TYPE",
        "MNEMO_DATABASE_PATH",
        "MNEMO_SIMILARITY_THRESHOLD",
        "MNEMO_MAX_CONTEXT_WINDOW",
        "MNEMO_DECAY_RATE",
        "MNEMO_DECAY_MODE",
        "MNEMO_EMBED_TIMEOUT_MS",
    ];
    for var in vars {
        // SAFETY: see set_env_var.
        unsafe { std::env::remove_var(var) };
    }
}
