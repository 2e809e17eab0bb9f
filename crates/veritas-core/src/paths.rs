//! Artifact location resolution.
//!
//! Each artifact path is either an explicit override (environment or CLI) or
//! a conventional default under a base directory. Resolution never touches
//! the file system; missing files surface later, at load time.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Model artifact location, relative to the base directory.
pub const DEFAULT_MODEL_FILE: &str = "model/basic_classifier.json";
/// Vectorizer artifact location, relative to the base directory.
pub const DEFAULT_VECTORIZER_FILE: &str = "model/count_vectorizer.json";

/// Environment fallbacks for the CLI's `--model-path` / `--vectorizer-path`.
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";
pub const VECTORIZER_PATH_ENV: &str = "VECTORIZER_PATH";

/// Raw, unvalidated path overrides as read from configuration.
#[derive(Debug, Clone, Default)]
pub struct ArtifactOverrides {
    pub model: Option<String>,
    pub vectorizer: Option<String>,
}

/// Absolute locations of the two serialized artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    model: PathBuf,
    vectorizer: PathBuf,
}

impl ArtifactPaths {
    /// Resolve both paths against `base_dir`.
    ///
    /// An override is honoured only when non-empty after trimming. Relative
    /// overrides are joined onto `base_dir`.
    pub fn resolve(base_dir: &Path, overrides: &ArtifactOverrides) -> Self {
        Self {
            model: pick(base_dir, overrides.model.as_deref(), DEFAULT_MODEL_FILE),
            vectorizer: pick(
                base_dir,
                overrides.vectorizer.as_deref(),
                DEFAULT_VECTORIZER_FILE,
            ),
        }
    }

    /// Resolve against the process working directory.
    pub fn resolve_from_cwd(overrides: &ArtifactOverrides) -> Self {
        let base = std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot determine working directory, using '.'");
            PathBuf::from(".")
        });
        Self::resolve(&base, overrides)
    }

    pub fn model(&self) -> &Path {
        &self.model
    }

    pub fn vectorizer(&self) -> &Path {
        &self.vectorizer
    }
}

fn pick(base_dir: &Path, override_path: Option<&str>, default: &str) -> PathBuf {
    let chosen = override_path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(default);
    let path = Path::new(chosen);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
