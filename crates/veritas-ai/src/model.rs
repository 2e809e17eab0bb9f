//! Multinomial naive Bayes decision procedure over count features.

use serde::Deserialize;
use veritas_core::{ClassValue, FeatureVector, InferenceError};

/// Maps a feature vector to exactly one class.
pub trait Model: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<&ClassValue, InferenceError>;

    /// Number of features the model was fitted on.
    fn n_features(&self) -> usize;

    /// The label space, in the order the model was fitted with.
    fn classes(&self) -> &[ClassValue];
}

/// On-disk form of a fitted multinomial naive Bayes classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct MultinomialNbSpec {
    pub classes: Vec<ClassValue>,
    pub class_log_prior: Vec<f64>,
    /// One row per class, one column per feature.
    pub feature_log_prob: Vec<Vec<f64>>,
}

#[derive(Debug)]
pub struct MultinomialNb {
    classes: Vec<ClassValue>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNb {
    pub fn from_spec(spec: MultinomialNbSpec) -> Result<Self, String> {
        let n_classes = spec.classes.len();
        if n_classes == 0 {
            return Err("model has no classes".into());
        }
        if spec.class_log_prior.len() != n_classes {
            return Err(format!(
                "class_log_prior has {} entries for {n_classes} classes",
                spec.class_log_prior.len()
            ));
        }
        if spec.feature_log_prob.len() != n_classes {
            return Err(format!(
                "feature_log_prob has {} rows for {n_classes} classes",
                spec.feature_log_prob.len()
            ));
        }

        let n_features = spec.feature_log_prob[0].len();
        for (c, row) in spec.feature_log_prob.iter().enumerate() {
            if row.len() != n_features {
                return Err(format!(
                    "feature_log_prob row {c} has {} columns, expected {n_features}",
                    row.len()
                ));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(format!("feature_log_prob row {c} has non-finite values"));
            }
        }
        if spec.class_log_prior.iter().any(|v| !v.is_finite()) {
            return Err("class_log_prior has non-finite values".into());
        }

        Ok(Self {
            classes: spec.classes,
            class_log_prior: spec.class_log_prior,
            feature_log_prob: spec.feature_log_prob,
            n_features,
        })
    }

    /// Joint log-likelihood of each class for one sample.
    fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        if features.dim() != self.n_features {
            return Err(InferenceError::DimensionMismatch {
                got: features.dim(),
                expected: self.n_features,
            });
        }
        let mut jll = self.class_log_prior.clone();
        for &(index, value) in features.entries() {
            if index >= self.n_features {
                return Err(InferenceError::FeatureOutOfRange {
                    index,
                    features: self.n_features,
                });
            }
            for (score, row) in jll.iter_mut().zip(&self.feature_log_prob) {
                *score += value * row[index];
            }
        }
        Ok(jll)
    }
}

impl Model for MultinomialNb {
    fn predict(&self, features: &FeatureVector) -> Result<&ClassValue, InferenceError> {
        let jll = self.joint_log_likelihood(features)?;
        // Strict comparison keeps the earliest class on ties.
        let mut best = 0;
        for (c, &score) in jll.iter().enumerate().skip(1) {
            if score > jll[best] {
                best = c;
            }
        }
        Ok(&self.classes[best])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[ClassValue] {
        &self.classes
    }
}
