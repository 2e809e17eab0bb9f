//! Inference layer: count vectorization, naive Bayes classification, and the
//! once-only loader that owns both artifacts for the life of the process.

mod artifacts;
mod engine;
mod loader;
pub mod model;
pub mod vectorizer;

pub use artifacts::{ArtifactSource, FeatureMismatch, FsArtifactSource, LoadedArtifacts};
pub use engine::predict;
pub use loader::{ArtifactCell, LoadError};
pub use model::{Model, MultinomialNb};
pub use vectorizer::{CountVectorizer, Vectorizer};
