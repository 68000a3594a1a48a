//! Storage backends for memory records.
//!
//! This module provides:
//! - `RecordStore`: the capability interface the engine ranks against
//! - `PersistentStore`: append-only JSONL log, durable across restarts
//! - `TransientStore`: process-lifetime in-memory mapping
//!
//! Backends are interchangeable; the engine never branches on which one
//! it was given.

pub mod persistent;
pub mod transient;

use chrono::{DateTime, Utc};

use crate::record::{MemoryRecord, RecordDraft, RecordId};

pub use persistent::PersistentStore;
pub use transient::TransientStore;

/// Error types for storage operations.
#[derive(Debug)]
pub enum Error {
    Io(String),
    Serialize(String),
    Corrupt { line: usize, message: String },
    MismatchedDimensions { expected: usize, actual: usize },
    EmptyEmbedding,
    TimestampOrder { newest: DateTime<Utc>, given: DateTime<Utc> },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            Error::Corrupt { line, message } => {
                write!(f, "Corrupt record at line {}: {}", line, message)
            }
            Error::MismatchedDimensions { expected, actual } => {
                write!(
                    f,
                    "Mismatched dimensions: store holds {}-dimensional embeddings, got {}",
                    expected, actual
                )
            }
            Error::EmptyEmbedding => write!(f, "Cannot store an empty embedding"),
            Error::TimestampOrder { newest, given } => {
                write!(
                    f,
                    "Timestamp {} is older than the newest committed record ({})",
                    given, newest
                )
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Keyed storage of memory records.
///
/// Implementations own all records: the engine works on snapshot copies
/// and never mutates a private copy independently. All methods take
/// `&self`; implementations guard their own interior state.
pub trait RecordStore: Send + Sync {
    /// Append a record. Assigns the id (monotonically increasing) and the
    /// timestamp when the draft does not carry one. Returns the new id.
    fn put(&self, draft: RecordDraft) -> Result<RecordId>;

    /// Snapshot of every record, in id (= insertion) order.
    fn get_all(&self) -> Result<Vec<MemoryRecord>>;

    /// Candidate records for a query embedding.
    ///
    /// The default is the full snapshot. A backend may narrow the set by
    /// coarse criteria, but must not drop records that could pass the
    /// caller's relevance threshold.
    fn candidates(&self, _query_embedding: &[f32]) -> Result<Vec<MemoryRecord>> {
        self.get_all()
    }

    /// Remove a record. Returns true if it existed.
    fn delete(&self, id: RecordId) -> Result<bool>;

    /// Remove every record.
    fn clear(&self) -> Result<()>;

    /// Stamp `last_accessed` on the given records.
    fn touch(&self, ids: &[RecordId], at: DateTime<Utc>) -> Result<()>;

    /// Number of stored records.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Check an incoming embedding against the store's established
/// dimensionality, establishing it on first use.
pub(crate) fn check_dimensions(established: &mut Option<usize>, embedding: &[f32]) -> Result<()> {
    if embedding.is_empty() {
        return Err(Error::EmptyEmbedding);
    }
    match *established {
        None => {
            *established = Some(embedding.len());
            Ok(())
        }
        Some(expected) if expected == embedding.len() => Ok(()),
        Some(expected) => Err(Error::MismatchedDimensions {
            expected,
            actual: embedding.len(),
        }),
    }
}
