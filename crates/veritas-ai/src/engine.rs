//! Text in, label out.

use veritas_core::{InferenceError, Label};

use crate::artifacts::LoadedArtifacts;

/// Classify one piece of text with an already loaded pair.
///
/// Deterministic for a given `(artifacts, text)`. The model's class value is
/// normalized to a plain text [`Label`] before it leaves this function.
pub fn predict(artifacts: &LoadedArtifacts, text: &str) -> Result<Label, InferenceError> {
    if text.trim().is_empty() {
        return Err(InferenceError::EmptyInput);
    }
    let features = artifacts.vectorizer().transform(text);
    let class = artifacts.model().predict(&features)?;
    Ok(Label::from(class))
}
