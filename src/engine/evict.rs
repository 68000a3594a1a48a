//! Decay-driven eviction.

use log::info;

use crate::errors::Error;

use super::core::MemoryEngine;

impl MemoryEngine {
    #[must_use = "handle the error or the removal count is lost"]
    /// Permanently remove records whose relevance has decayed away.
    ///
    /// This is how old information is forgotten without requiring a
    /// query: each record's pure decay factor (no similarity term) is
    /// compared against `cutoff_score / 100`, and records below the
    /// cutoff are deleted. Returns the number of records removed.
    ///
    /// Eviction runs only when called; there is no background pass.
    /// Callers typically invoke it periodically or before a `recall`.
    /// The scan works on a snapshot, so a concurrent `recall` that has
    /// already selected a record is unaffected. With `decay_rate = 0`
    /// nothing ever qualifies. A disabled engine removes nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a cutoff outside [0, 100] and
    /// propagates storage failures.
    pub fn forget_stale(&self, cutoff_score: f64) -> Result<usize, Error> {
        if cutoff_score.is_nan() || !(0.0..=100.0).contains(&cutoff_score) {
            return Err(Error::InvalidInput(format!(
                "Invalid cutoff score: {cutoff_score} (must be between 0 and 100)"
            )));
        }
        if !self.config.enabled {
            return Ok(0);
        }

        let now = self.clock.now();
        let cutoff = cutoff_score / 100.0;
        let snapshot = self.store.get_all()?;

        let mut removed = 0;
        for record in snapshot {
            if self.scorer.retention(&record, now) < cutoff && self.store.delete(record.id)? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("forgot {removed} stale records (cutoff={cutoff_score})");
        }
        Ok(removed)
    }
}
