//! Core engine struct, construction, and shared plumbing.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::clock::{Clock, SystemClock};
use crate::config::{MemoryConfig, StorageType};
use crate::embedder::{Embedder, embed_bounded};
use crate::errors::Error;
use crate::scoring::RelevanceScorer;
use crate::store::{PersistentStore, RecordStore, TransientStore};

/// Maximum allowed input length (100,000 characters).
pub const MAX_INPUT_LENGTH: usize = 100_000;

/// Relevance-ranked memory engine.
///
/// Holds an immutable configuration, a record store selected by that
/// configuration, and the injected embedding and clock capabilities. All
/// operations take `&self`; the engine is safe to share across worker
/// threads.
pub struct MemoryEngine {
    pub(crate) config: MemoryConfig,
    pub(crate) store: Box<dyn RecordStore>,
    pub(crate) scorer: RelevanceScorer,
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl MemoryEngine {
    /// Build an engine with the system clock.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid configuration and
    /// `Error::Storage` if the persistent log cannot be opened.
    pub fn new(config: MemoryConfig, embedder: Arc<dyn Embedder>) -> Result<Self, Error> {
        Self::with_clock(config, embedder, Arc::new(SystemClock))
    }

    /// Build an engine with an injected clock (deterministic tests).
    pub fn with_clock(
        config: MemoryConfig,
        embedder: Arc<dyn Embedder>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        config.validate()?;
        let store: Box<dyn RecordStore> = match config.storage_type {
            StorageType::Persistent => Box::new(PersistentStore::open(&config.database_path)?),
            StorageType::Transient => Box::new(TransientStore::new()),
        };
        Ok(Self::assemble(config, embedder, clock, store))
    }

    /// Build an engine around a caller-provided store backend.
    pub fn with_store(
        config: MemoryConfig,
        embedder: Arc<dyn Embedder>,
        clock: Arc<dyn Clock>,
        store: Box<dyn RecordStore>,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::assemble(config, embedder, clock, store))
    }

    fn assemble(
        config: MemoryConfig,
        embedder: Arc<dyn Embedder>,
        clock: Arc<dyn Clock>,
        store: Box<dyn RecordStore>,
    ) -> Self {
        let scorer = RelevanceScorer::new(config.decay_rate, config.decay_mode);
        info!(
            "memory engine ready (enabled={}, threshold={}, window={}, decay_rate={})",
            config.enabled,
            config.similarity_threshold,
            config.max_context_window,
            config.decay_rate
        );
        Self {
            config,
            store,
            scorer,
            embedder,
            clock,
        }
    }

    /// Whether memory is enabled for this engine.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.store.is_empty()?)
    }

    /// Remove every record from the store.
    pub fn clear(&self) -> Result<(), Error> {
        Ok(self.store.clear()?)
    }

    /// Embed text, bounded by the configured timeout.
    pub(crate) fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        let timeout = self.config.embed_timeout_ms.map(Duration::from_millis);
        embed_bounded(&self.embedder, text, timeout)
    }

    /// Validate input length (rejects empty and whitespace-only inputs).
    pub(crate) fn validate_input_length(text: &str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        if text.len() > MAX_INPUT_LENGTH {
            return Err(Error::InputTooLong {
                max_length: MAX_INPUT_LENGTH,
                actual_length: text.len(),
            });
        }
        Ok(())
    }
}
