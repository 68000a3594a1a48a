//! Relevance scoring: cosine similarity with time-based decay.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::Error;
use crate::record::MemoryRecord;

/// Reference time used for decay calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayMode {
    /// Decay from the record's creation time.
    Created,
    /// Decay from the record's last retrieval hit (falls back to creation
    /// time for records never recalled).
    LastAccessed,
}

impl std::str::FromStr for DecayMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Error> {
        match value.trim() {
            "created" => Ok(DecayMode::Created),
            "last_accessed" => Ok(DecayMode::LastAccessed),
            other => Err(Error::Config(format!(
                "Invalid decay mode: {other:?} (expected \"created\" or \"last_accessed\")"
            ))),
        }
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// # Errors
///
/// - Returns `Error::InvalidInput` if either vector is empty or contains
///   NaN or infinite values.
/// - Returns `Error::Config` if the vectors have different lengths. The
///   store keeps dimensionality constant, so a mismatch here means the
///   deployment is misconfigured; the query fails rather than degrade.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, Error> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::InvalidInput(
            "Cannot compute similarity with an empty vector".to_string(),
        ));
    }

    if a.len() != b.len() {
        return Err(Error::Config(format!(
            "Mismatched embedding dimensions: query has {}, record has {}",
            a.len(),
            b.len()
        )));
    }

    if a.iter().any(|x| x.is_nan() || x.is_infinite())
        || b.iter().any(|x| x.is_nan() || x.is_infinite())
    {
        return Err(Error::InvalidInput(
            "Vector contains NaN or infinite values".to_string(),
        ));
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Computes time-decayed relevance scores in [0, 100].
///
/// Base similarity is cosine similarity mapped linearly from [-1, 1] to
/// [0, 100], then multiplied by `e^(-decay_rate × elapsed_seconds)`. The
/// product never exceeds the undecayed similarity and is non-increasing
/// in elapsed time; `decay_rate = 0` yields pure similarity ranking.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer {
    decay_rate: f64,
    mode: DecayMode,
}

impl RelevanceScorer {
    /// Build a scorer. `decay_rate` is per-second relevance falloff and
    /// must already be validated (non-negative, finite) by configuration.
    pub fn new(decay_rate: f64, mode: DecayMode) -> Self {
        Self { decay_rate, mode }
    }

    /// Score a record against a query embedding at time `now`.
    ///
    /// # Errors
    ///
    /// Propagates the `cosine_similarity` errors, including the fatal
    /// dimension-mismatch `Error::Config`.
    pub fn score(
        &self,
        query_embedding: &[f32],
        record: &MemoryRecord,
        now: DateTime<Utc>,
    ) -> Result<f64, Error> {
        let cosine = cosine_similarity(query_embedding, &record.embedding)?;
        let base = (cosine + 1.0) * 50.0;
        Ok(base * self.retention(record, now))
    }

    /// Pure decay factor for a record in [0, 1], independent of any query.
    ///
    /// This is what eviction compares against its cutoff: 1.0 for a brand
    /// new record, approaching 0.0 as the record ages.
    pub fn retention(&self, record: &MemoryRecord, now: DateTime<Utc>) -> f64 {
        let reference = match self.mode {
            DecayMode::Created => record.timestamp,
            DecayMode::LastAccessed => record.last_accessed.unwrap_or(record.timestamp),
        };
        let elapsed = now.signed_duration_since(reference).num_seconds().max(0) as f64;
        self.decay_factor(elapsed)
    }

    /// `e^(-decay_rate × elapsed_seconds)`, guarded against underflow.
    pub fn decay_factor(&self, elapsed_seconds: f64) -> f64 {
        if self.decay_rate == 0.0 {
            return 1.0;
        }
        let exponent = -self.decay_rate * elapsed_seconds.max(0.0);
        if exponent < -700.0 {
            return 0.0;
        }
        exponent.exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;
    use chrono::Duration;

    fn record_at(timestamp: DateTime<Utc>, embedding: Vec<f32>) -> MemoryRecord {
        MemoryRecord {
            id: RecordId(1),
            timestamp,
            content: "test".to_string(),
            embedding,
            last_accessed: None,
        }
    }

    fn t0() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let vec = vec![1.0f32; 8];
        let sim = cosine_similarity(&vec, &vec).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let mut a = vec![0.0f32; 8];
        let mut b = vec![0.0f32; 8];
        a[0] = 1.0;
        b[1] = 1.0;
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0f32; 8];
        let b = vec![-1.0f32; 8];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_empty_vector() {
        let empty: Vec<f32> = vec![];
        let vec = vec![1.0f32; 8];
        assert!(cosine_similarity(&empty, &vec).is_err());
    }

    #[test]
    fn test_cosine_mismatched_dimensions_is_config_error() {
        let a = vec![1.0f32; 8];
        let b = vec![1.0f32; 4];
        assert!(matches!(cosine_similarity(&a, &b), Err(Error::Config(_))));
    }

    #[test]
    fn test_cosine_nan_rejected() {
        let mut a = vec![1.0f32; 8];
        a[0] = f32::NAN;
        let b = vec![1.0f32; 8];
        assert!(cosine_similarity(&a, &b).is_err());
    }

    #[test]
    fn test_cosine_zero_norm() {
        let zero = vec![0.0f32; 8];
        let vec = vec![1.0f32; 8];
        let sim = cosine_similarity(&zero, &vec).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_base_similarity_mapping() {
        // cosine 1 -> 100, cosine 0 -> 50, cosine -1 -> 0 (no decay).
        let scorer = RelevanceScorer::new(0.0, DecayMode::Created);
        let now = t0();

        let aligned = record_at(now, vec![1.0, 0.0]);
        let orthogonal = record_at(now, vec![0.0, 1.0]);
        let opposite = record_at(now, vec![-1.0, 0.0]);
        let query = vec![1.0, 0.0];

        assert!((scorer.score(&query, &aligned, now).unwrap() - 100.0).abs() < 1e-9);
        assert!((scorer.score(&query, &orthogonal, now).unwrap() - 50.0).abs() < 1e-9);
        assert!(scorer.score(&query, &opposite, now).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_zero_decay_rate_score_is_constant() {
        let scorer = RelevanceScorer::new(0.0, DecayMode::Created);
        let record = record_at(t0(), vec![1.0, 0.0]);
        let query = vec![1.0, 0.0];

        let fresh = scorer.score(&query, &record, t0()).unwrap();
        let year_later = scorer
            .score(&query, &record, t0() + Duration::days(365))
            .unwrap();
        assert_eq!(fresh, year_later);
    }

    #[test]
    fn test_decay_monotonically_non_increasing() {
        let scorer = RelevanceScorer::new(0.0001, DecayMode::Created);
        let record = record_at(t0(), vec![1.0, 0.0]);
        let query = vec![1.0, 0.0];

        let mut previous = f64::INFINITY;
        for elapsed in [0, 10, 100, 1_000, 10_000, 100_000] {
            let score = scorer
                .score(&query, &record, t0() + Duration::seconds(elapsed))
                .unwrap();
            assert!(score <= previous, "score rose at elapsed={elapsed}");
            previous = score;
        }
    }

    #[test]
    fn test_decayed_score_never_exceeds_base() {
        let scorer = RelevanceScorer::new(0.5, DecayMode::Created);
        let record = record_at(t0(), vec![1.0, 0.0]);
        let query = vec![1.0, 0.0];

        let score = scorer
            .score(&query, &record, t0() + Duration::seconds(3))
            .unwrap();
        assert!(score <= 100.0);
        assert!(score < 100.0);
    }

    #[test]
    fn test_decay_matches_expected_value_at_100_seconds() {
        // decay_rate 0.0001, elapsed 100s: 90 * e^(-0.01) ~= 89.1045
        let scorer = RelevanceScorer::new(0.0001, DecayMode::Created);
        let cosine = 0.8f32; // maps to base similarity 90
        let record = record_at(t0(), vec![cosine, (1.0 - cosine * cosine).sqrt()]);
        let query = vec![1.0, 0.0];

        let score = scorer
            .score(&query, &record, t0() + Duration::seconds(100))
            .unwrap();
        assert!((score - 90.0 * (-0.01f64).exp()).abs() < 1e-4);
    }

    #[test]
    fn test_negative_elapsed_clamped() {
        // A record stamped in the future must not score above its base.
        let scorer = RelevanceScorer::new(0.0001, DecayMode::Created);
        let record = record_at(t0() + Duration::seconds(500), vec![1.0, 0.0]);
        let query = vec![1.0, 0.0];

        let score = scorer.score(&query, &record, t0()).unwrap();
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_age_decays_to_zero() {
        let scorer = RelevanceScorer::new(1.0, DecayMode::Created);
        assert_eq!(scorer.decay_factor(1e9), 0.0);
    }

    #[test]
    fn test_last_accessed_mode_uses_access_stamp() {
        let scorer = RelevanceScorer::new(0.0001, DecayMode::LastAccessed);
        let mut record = record_at(t0(), vec![1.0, 0.0]);
        let now = t0() + Duration::seconds(50_000);

        let decayed = scorer.retention(&record, now);
        assert!(decayed < 1.0);

        // A retrieval hit just now resets the decay reference.
        record.last_accessed = Some(now);
        let refreshed = scorer.retention(&record, now);
        assert!((refreshed - 1.0).abs() < 1e-12);
        assert!(refreshed > decayed);
    }

    #[test]
    fn test_last_accessed_mode_falls_back_to_creation() {
        let scorer = RelevanceScorer::new(0.0001, DecayMode::LastAccessed);
        let record = record_at(t0(), vec![1.0, 0.0]);
        let now = t0() + Duration::seconds(100);

        let by_access = scorer.retention(&record, now);
        let by_creation = RelevanceScorer::new(0.0001, DecayMode::Created).retention(&record, now);
        assert_eq!(by_access, by_creation);
    }

    #[test]
    fn test_decay_mode_from_str() {
        assert_eq!("created".parse::<DecayMode>().unwrap(), DecayMode::Created);
        assert_eq!(
            "last_accessed".parse::<DecayMode>().unwrap(),
            DecayMode::LastAccessed
        );
        assert!("sometimes".parse::<DecayMode>().is_err());
    }
}
