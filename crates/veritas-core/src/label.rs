//! Class values as stored in a model artifact, and their textual form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A class identifier exactly as the training pipeline serialized it.
///
/// Exporters emit whatever type the classifier was fitted on: strings for
/// `"FAKE"`/`"REAL"` style targets, integers or floats for encoded targets,
/// occasionally booleans.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ClassValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ClassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A predicted label in plain text, ready to leave the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&ClassValue> for Label {
    fn from(value: &ClassValue) -> Self {
        match value {
            ClassValue::Text(s) => Self(s.clone()),
            other => Self(other.to_string()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
