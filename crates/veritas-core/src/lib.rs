pub mod error;
pub mod features;
pub mod label;
pub mod paths;

pub use error::{ArtifactError, InferenceError};
pub use features::FeatureVector;
pub use label::{ClassValue, Label};
pub use paths::{ArtifactOverrides, ArtifactPaths};
