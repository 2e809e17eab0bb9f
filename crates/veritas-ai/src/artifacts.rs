//! The vectorizer/model pair and where it comes from.

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use veritas_core::{ArtifactError, ArtifactPaths};

use crate::model::{Model, MultinomialNb, MultinomialNbSpec};
use crate::vectorizer::{CountVectorizer, CountVectorizerSpec, Vectorizer};

/// The vectorizer and model do not agree on the feature space.
#[derive(Debug, Error)]
#[error("vectorizer emits {vectorizer} features but model expects {model}")]
pub struct FeatureMismatch {
    pub vectorizer: usize,
    pub model: usize,
}

/// A matched vectorizer and model. Only constructible as a pair.
pub struct LoadedArtifacts {
    vectorizer: Box<dyn Vectorizer>,
    model: Box<dyn Model>,
}

impl LoadedArtifacts {
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        model: Box<dyn Model>,
    ) -> Result<Self, FeatureMismatch> {
        if vectorizer.n_features() != model.n_features() {
            return Err(FeatureMismatch {
                vectorizer: vectorizer.n_features(),
                model: model.n_features(),
            });
        }
        Ok(Self { vectorizer, model })
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }
}

impl std::fmt::Debug for LoadedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifacts")
            .field("n_features", &self.model.n_features())
            .field("classes", &self.model.classes())
            .finish()
    }
}

/// Something that can physically produce a [`LoadedArtifacts`].
///
/// Each call performs a full load; deduplication is the caller's job
/// (see [`ArtifactCell`](crate::ArtifactCell)).
pub trait ArtifactSource: Send + Sync {
    fn load(&self) -> Result<LoadedArtifacts, ArtifactError>;
}

/// Loads JSON artifacts from the file system.
#[derive(Debug, Clone)]
pub struct FsArtifactSource {
    paths: ArtifactPaths,
}

impl FsArtifactSource {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths }
    }
}

impl ArtifactSource for FsArtifactSource {
    fn load(&self) -> Result<LoadedArtifacts, ArtifactError> {
        let vectorizer_path = self.paths.vectorizer();
        let spec: CountVectorizerSpec = read_json(vectorizer_path)?;
        let vectorizer = CountVectorizer::from_spec(spec)
            .map_err(|reason| ArtifactError::corrupt(vectorizer_path, reason))?;
        debug!(
            path = %vectorizer_path.display(),
            features = vectorizer.n_features(),
            "vectorizer deserialized"
        );

        let model_path = self.paths.model();
        let spec: MultinomialNbSpec = read_json(model_path)?;
        let model = MultinomialNb::from_spec(spec)
            .map_err(|reason| ArtifactError::corrupt(model_path, reason))?;
        debug!(
            path = %model_path.display(),
            classes = model.classes().len(),
            "model deserialized"
        );

        LoadedArtifacts::new(Box::new(vectorizer), Box::new(model))
            .map_err(|e| ArtifactError::corrupt(model_path, e.to_string()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ArtifactError::corrupt(path, e.to_string()))
}
