//! Bag-of-words count vectorizer.
//!
//! Mirrors the behaviour of a fitted token-count vectorizer exported to JSON:
//! optional lowercasing, regex tokenization, stop-word removal, word n-grams,
//! then a count per known vocabulary term. Unknown terms are ignored.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::Deserialize;
use veritas_core::FeatureVector;

/// Default token pattern: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Maps raw text to a feature representation.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> FeatureVector;

    /// Dimensionality of every vector this vectorizer emits.
    fn n_features(&self) -> usize;
}

/// On-disk form of a fitted count vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct CountVectorizerSpec {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub binary: bool,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// A validated, ready-to-use count vectorizer.
#[derive(Debug)]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    binary: bool,
}

impl CountVectorizer {
    /// Validate a deserialized spec. The error string describes what is wrong.
    pub fn from_spec(spec: CountVectorizerSpec) -> Result<Self, String> {
        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        let token_pattern = Regex::new(&spec.token_pattern)
            .map_err(|e| format!("invalid token_pattern: {e}"))?;
        // Group 0 is the whole match; at most one explicit group may select the token.
        if token_pattern.captures_len() > 2 {
            return Err("token_pattern has more than one capturing group".into());
        }

        let n = spec.vocabulary.len();
        let mut seen = vec![false; n];
        for (term, &index) in &spec.vocabulary {
            if index >= n {
                return Err(format!(
                    "vocabulary index {index} for {term:?} out of range 0..{n}"
                ));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(format!("vocabulary index {index} assigned twice"));
            }
        }

        Ok(Self {
            vocabulary: spec.vocabulary,
            lowercase: spec.lowercase,
            token_pattern,
            ngram_range: spec.ngram_range,
            stop_words: spec.stop_words.into_iter().collect(),
            binary: spec.binary,
        })
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(text)
                // A match where the group did not participate yields no token.
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect()
        } else {
            self.token_pattern
                .find_iter(text)
                .map(|m| m.as_str())
                .collect()
        }
    }

    /// Terms in document order, after stop-word removal and n-gram expansion.
    fn analyze(&self, text: &str) -> Vec<String> {
        let normalized = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self
            .tokenize(&normalized)
            .into_iter()
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

impl Vectorizer for CountVectorizer {
    fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }
        if self.binary {
            counts.values_mut().for_each(|c| *c = 1.0);
        }
        FeatureVector::from_entries(self.n_features(), counts.into_iter().collect())
    }

    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}
