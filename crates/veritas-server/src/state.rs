//! State shared by every handler.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use veritas_ai::{ArtifactCell, ArtifactSource, FsArtifactSource};
use veritas_core::{ArtifactPaths, Label};

use crate::error::{Result, ServiceError};

pub struct AppState {
    paths: ArtifactPaths,
    artifacts: Arc<ArtifactCell>,
}

impl AppState {
    /// State backed by the JSON artifacts at `paths`.
    pub fn new(paths: ArtifactPaths) -> Self {
        let source = FsArtifactSource::new(paths.clone());
        Self::with_source(paths, source)
    }

    /// State backed by an arbitrary source. `paths` is only reported, not read.
    pub fn with_source(paths: ArtifactPaths, source: impl ArtifactSource + 'static) -> Self {
        Self {
            paths,
            artifacts: Arc::new(ArtifactCell::new(source)),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn artifacts(&self) -> &Arc<ArtifactCell> {
        &self.artifacts
    }

    pub fn model_loaded(&self) -> bool {
        self.artifacts.is_loaded()
    }

    /// Ensure artifacts are loaded, then classify `text`.
    pub async fn classify(&self, text: &str) -> Result<Label> {
        let artifacts = self
            .artifacts
            .ensure_loaded_async()
            .await
            .map_err(ServiceError::from)?;
        let label = veritas_ai::predict(&artifacts, text)?;
        debug!(label = %label, chars = text.chars().count(), "prediction served");
        Ok(label)
    }

    /// Start loading in the background. Failures are logged and dropped; the
    /// next request retries the load.
    pub fn spawn_warmup(&self) -> JoinHandle<()> {
        let artifacts = Arc::clone(&self.artifacts);
        tokio::spawn(async move {
            match artifacts.ensure_loaded_async().await {
                Ok(_) => info!("warm-up finished, artifacts ready"),
                Err(e) => warn!(error = %e, "warm-up failed, artifacts will load on demand"),
            }
        })
    }
}
