//! Context assembly for prompt building.
//!
//! The conversational loop wants two kinds of memory in a prompt: the
//! tail of the current conversation, included unconditionally, and
//! relevance-ranked older memories that the tail would otherwise crowd
//! out. `assemble_context` produces both in one ordered sequence.

use std::collections::HashSet;

use crate::errors::Error;
use crate::record::{MemoryRecord, RecalledMemory, RecordId};
use crate::scoring::DecayMode;

use super::core::MemoryEngine;

impl MemoryEngine {
    #[must_use = "handle the error or results may be lost"]
    /// The newest `limit` records, in insertion order.
    pub fn recent(&self, limit: usize) -> Result<Vec<MemoryRecord>, Error> {
        if !self.config.enabled {
            return Ok(Vec::new());
        }
        let mut records = self.store.get_all()?;
        let start = records.len().saturating_sub(limit);
        Ok(records.split_off(start))
    }

    #[must_use = "handle the error or results may be lost"]
    /// Assemble a context window for `query`: the newest `recent_limit`
    /// records first (chronological, included regardless of relevance),
    /// followed by up to `max_context_window` relevance-ranked older
    /// records that clear the similarity threshold.
    ///
    /// Records in the recent tail never reappear in the ranked portion.
    /// Every entry carries its decayed score for the caller's benefit.
    ///
    /// # Errors
    ///
    /// Same failure surface as `recall`.
    pub fn assemble_context(
        &self,
        query: &str,
        recent_limit: usize,
    ) -> Result<Vec<RecalledMemory>, Error> {
        if !self.config.enabled {
            return Ok(Vec::new());
        }
        let query = query.trim();
        Self::validate_input_length(query)?;

        let query_embedding = self.embed(query)?;
        let now = self.clock.now();

        let recent = {
            let mut records = self.store.get_all()?;
            let start = records.len().saturating_sub(recent_limit);
            records.split_off(start)
        };
        let exclude: HashSet<RecordId> = recent.iter().map(|record| record.id).collect();

        let mut context = Vec::with_capacity(recent.len());
        for record in &recent {
            let score = self.scorer.score(&query_embedding, record, now)?;
            context.push(RecalledMemory {
                id: record.id,
                content: record.content.clone(),
                score,
                timestamp: record.timestamp,
            });
        }

        let relevant = self.rank(&query_embedding, now, &exclude, self.config.max_context_window)?;
        if self.config.decay_mode == DecayMode::LastAccessed && !relevant.is_empty() {
            let ids: Vec<RecordId> = relevant.iter().map(|memory| memory.id).collect();
            self.store.touch(&ids, now)?;
        }
        context.extend(relevant);

        Ok(context)
    }
}

/// Join assembled context into a single prompt block.
pub fn format_context(context: &[RecalledMemory]) -> String {
    context
        .iter()
        .map(|memory| memory.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
