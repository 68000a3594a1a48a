//! Embedding capability boundary.
//!
//! The embedding model itself is not part of this crate: callers inject
//! anything that maps text to a fixed-length vector (an ONNX runtime, an
//! HTTP embedding API, a test stub). The engine only assumes the model is
//! stable per deployment and produces the same dimensionality for every
//! call.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::errors::Error;

/// Text-to-vector capability injected into the memory engine.
pub trait Embedder: Send + Sync {
    /// Embed `text` into a fixed-length vector.
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` if the underlying model fails.
    fn embed(&self, text: &str) -> Result<Vec<f32>, Error>;
}

/// Run an embedding call with an optional upper bound on wall-clock time.
///
/// With no timeout the call runs inline. With a timeout the call runs on a
/// short-lived worker thread; if the deadline passes first the worker is
/// abandoned (it finishes on its own and its result is dropped) and
/// `Error::EmbeddingTimeout` is returned. A worker that dies without
/// replying surfaces as `Error::Embedding`.
pub(crate) fn embed_bounded(
    embedder: &Arc<dyn Embedder>,
    text: &str,
    timeout: Option<Duration>,
) -> Result<Vec<f32>, Error> {
    let Some(limit) = timeout else {
        return embedder.embed(text);
    };

    let (tx, rx) = mpsc::channel();
    let worker_embedder = Arc::clone(embedder);
    let worker_text = text.to_string();
    thread::spawn(move || {
        let _ = tx.send(worker_embedder.embed(&worker_text));
    });

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(Error::EmbeddingTimeout {
            timeout_ms: limit.as_millis() as u64,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(Error::Embedding(
            "embedding worker exited without producing a result".to_string(),
        )),
    }
}
