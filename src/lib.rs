//! mnemo - a relevance-ranked memory engine for conversational AI agents.
//!
//! This crate stores past interactions alongside their embeddings,
//! retrieves the subset most relevant to the current query, and lets
//! stale memories decay out of influence without being silently lost.
//! The embedding model is injected (anything that maps text to a
//! fixed-length vector), and storage is pluggable between a durable
//! append-only log and a process-lifetime in-memory map.
//! All operations are synchronous (no async/await required).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mnemo::{Embedder, Error, MemoryConfig, MemoryEngine, StorageType};
//!
//! // Wrap your embedding model or API here.
//! struct MyEmbedder;
//!
//! impl Embedder for MyEmbedder {
//!     fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
//!         # let _ = text;
//!         Ok(vec![0.0; 384])
//!     }
//! }
//!
//! fn main() -> Result<(), Error> {
//!     let config = MemoryConfig {
//!         storage_type: StorageType::Transient,
//!         ..MemoryConfig::default()
//!     };
//!     let engine = MemoryEngine::new(config, Arc::new(MyEmbedder))?;
//!
//!     engine.remember("Alice works at Microsoft")?;
//!
//!     for memory in engine.recall("where does alice work")? {
//!         println!("{:.1}: {}", memory.score, memory.content);
//!     }
//!
//!     // Periodically let thoroughly decayed memories go.
//!     let forgotten = engine.forget_stale(10.0)?;
//!     println!("evicted {forgotten} stale memories");
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod embedder;
pub mod engine;
pub mod errors;
pub mod record;
pub mod scoring;
pub mod store;

// Re-export public API
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MemoryConfig, StorageType};
pub use embedder::Embedder;
pub use engine::{MAX_INPUT_LENGTH, MemoryEngine, format_context};
pub use errors::Error;
pub use record::{MemoryRecord, RecalledMemory, RecordDraft, RecordId};
pub use scoring::{DecayMode, RelevanceScorer, cosine_similarity};
pub use store::{PersistentStore, RecordStore, TransientStore};
