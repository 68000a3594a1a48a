//! Write path: storing new interactions.

use log::debug;

use crate::errors::Error;
use crate::record::{RecordDraft, RecordId};

use super::core::MemoryEngine;

impl MemoryEngine {
    #[must_use = "handle the error or the record id is lost"]
    /// Store one unit of interaction content.
    ///
    /// Embeds `content`, stamps it with the engine clock, and appends it
    /// to the record store. With memory disabled this is a no-op that
    /// returns `Ok(None)` without touching the store.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Content is empty or exceeds `MAX_INPUT_LENGTH`
    /// - Embedding fails or times out (nothing is written)
    /// - The storage backend rejects the write
    pub fn remember(&self, content: &str) -> Result<Option<RecordId>, Error> {
        if !self.config.enabled {
            debug!("memory disabled; skipping remember");
            return Ok(None);
        }
        Self::validate_input_length(content)?;

        let embedding = self.embed(content)?;
        let draft = RecordDraft::with_timestamp(content, embedding, self.clock.now());
        let id = self.store.put(draft)?;
        debug!("remembered record (id={}, content_len={})", id, content.len());
        Ok(Some(id))
    }

    #[must_use = "handle the error or the record id is lost"]
    /// Store a prompt/response pair as a single memory.
    ///
    /// The two turns are joined into one unit so the embedding captures
    /// the whole exchange.
    pub fn remember_interaction(
        &self,
        prompt: &str,
        response: &str,
    ) -> Result<Option<RecordId>, Error> {
        self.remember(&format!("{prompt}\n{response}"))
    }

    #[must_use = "handle the error or results may be lost"]
    /// Delete a record.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the record was deleted
    /// - `Ok(false)` if it didn't exist
    pub fn delete(&self, id: RecordId) -> Result<bool, Error> {
        Ok(self.store.delete(id)?)
    }
}
