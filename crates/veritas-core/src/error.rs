use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring the serialized artifacts into memory.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The file is absent or cannot be read. Retrying later may succeed.
    #[error("artifact not found or unreadable: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but does not describe a usable object.
    #[error("artifact is corrupt: {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl ArtifactError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure while running text through loaded artifacts.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("feature vector has {got} dimensions, model expects {expected}")]
    DimensionMismatch { got: usize, expected: usize },

    #[error("feature index {index} out of range for model with {features} features")]
    FeatureOutOfRange { index: usize, features: usize },
}
