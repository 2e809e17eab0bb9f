//! Once-only, retryable artifact initialization.
//!
//! [`ArtifactCell`] owns the single process-wide slot for the loaded
//! vectorizer/model pair. The slot starts empty and is written at most once.
//! A failed load leaves it empty so a later caller can try again.
//!
//! # Thread Safety
//!
//! - Fast path: one acquire load of the slot, no locking.
//! - Slow path: an exclusive section, then a second check of the slot so
//!   callers that queued behind a successful load reuse its result.
//! - The pair is published only after both artifacts deserialized and
//!   matched; readers never see half of it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};
use veritas_core::ArtifactError;

use crate::artifacts::{ArtifactSource, LoadedArtifacts};

/// Failure of the async entry point.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The blocking load task panicked or was aborted.
    #[error("artifact load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub struct ArtifactCell {
    source: Box<dyn ArtifactSource>,
    slot: OnceLock<Arc<LoadedArtifacts>>,
    load_lock: Mutex<()>,
    attempts: AtomicUsize,
}

impl ArtifactCell {
    pub fn new(source: impl ArtifactSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            slot: OnceLock::new(),
            load_lock: Mutex::new(()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// The published pair, if a load has completed.
    pub fn get(&self) -> Option<Arc<LoadedArtifacts>> {
        self.slot.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Number of physical loads started so far, successful or not.
    pub fn load_attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Return the loaded pair, loading it on this thread if nobody has yet.
    ///
    /// Blocks while another caller holds the load section.
    pub fn ensure_loaded(&self) -> Result<Arc<LoadedArtifacts>, ArtifactError> {
        if let Some(loaded) = self.slot.get() {
            return Ok(Arc::clone(loaded));
        }

        // A panic inside a previous load poisons the lock but never the slot.
        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(loaded) = self.slot.get() {
            return Ok(Arc::clone(loaded));
        }

        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        info!(attempt, "loading model artifacts");
        let start = Instant::now();

        let loaded = match self.source.load() {
            Ok(loaded) => Arc::new(loaded),
            Err(e) => {
                warn!(
                    attempt,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "model artifacts failed to load"
                );
                return Err(e);
            }
        };

        // Only writer: we hold the lock and saw the slot empty.
        let published = self.slot.get_or_init(|| loaded);
        info!(
            attempt,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "model artifacts loaded"
        );
        Ok(Arc::clone(published))
    }

    /// Async form of [`ensure_loaded`](Self::ensure_loaded).
    ///
    /// The slow path runs on the blocking pool. Dropping the returned future
    /// does not cancel a load in progress; it still publishes on success.
    pub async fn ensure_loaded_async(self: &Arc<Self>) -> Result<Arc<LoadedArtifacts>, LoadError> {
        if let Some(loaded) = self.get() {
            return Ok(loaded);
        }
        let cell = Arc::clone(self);
        let loaded = tokio::task::spawn_blocking(move || cell.ensure_loaded()).await??;
        Ok(loaded)
    }
}

impl std::fmt::Debug for ArtifactCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCell")
            .field("loaded", &self.is_loaded())
            .field("attempts", &self.load_attempts())
            .finish()
    }
}
