//! Read path: relevance-ranked retrieval.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::debug;

use crate::errors::Error;
use crate::record::{RecalledMemory, RecordId};
use crate::scoring::DecayMode;

use super::core::MemoryEngine;

impl MemoryEngine {
    #[must_use = "handle the error or results may be lost"]
    /// Retrieve the records most relevant to `query`, best first.
    ///
    /// Every candidate is scored with the current time, candidates below
    /// the similarity threshold are dropped, the rest are ordered by
    /// score descending (ties broken newest first), and at most
    /// `max_context_window` records are returned. With memory disabled
    /// the result is empty. When recency-of-access decay is configured,
    /// returned records get their `last_accessed` stamp updated.
    ///
    /// Zero qualifying records is not an error; the result is simply
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Query is empty or exceeds `MAX_INPUT_LENGTH`
    /// - Embedding fails or times out (no partial result is substituted)
    /// - The storage backend fails
    pub fn recall(&self, query: &str) -> Result<Vec<RecalledMemory>, Error> {
        if !self.config.enabled {
            return Ok(Vec::new());
        }
        let query = query.trim();
        Self::validate_input_length(query)?;

        let query_embedding = self.embed(query)?;
        let now = self.clock.now();
        let selected = self.rank(
            &query_embedding,
            now,
            &HashSet::new(),
            self.config.max_context_window,
        )?;

        if self.config.decay_mode == DecayMode::LastAccessed && !selected.is_empty() {
            let ids: Vec<RecordId> = selected.iter().map(|memory| memory.id).collect();
            self.store.touch(&ids, now)?;
        }

        debug!("recall returned {} records", selected.len());
        Ok(selected)
    }

    /// Score, filter, order, and bound candidates for one query.
    ///
    /// Works on a snapshot from the store, so concurrent writes and
    /// evictions cannot produce partially-visible records here.
    pub(crate) fn rank(
        &self,
        query_embedding: &[f32],
        now: DateTime<Utc>,
        exclude: &HashSet<RecordId>,
        limit: usize,
    ) -> Result<Vec<RecalledMemory>, Error> {
        let candidates = self.store.candidates(query_embedding)?;

        let mut scored = Vec::new();
        for record in &candidates {
            if exclude.contains(&record.id) {
                continue;
            }
            let score = self.scorer.score(query_embedding, record, now)?;
            if score < self.config.similarity_threshold {
                continue;
            }
            scored.push(RecalledMemory {
                id: record.id,
                content: record.content.clone(),
                score,
                timestamp: record.timestamp,
            });
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        scored.truncate(limit);
        Ok(scored)
    }
}
