//! Sparse feature representation shared by vectorizers and models.

/// A sparse row vector: `(index, value)` pairs sorted by index, no duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build from unsorted entries. Values for repeated indices are summed and
    /// zero values are dropped.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(i, _)| i);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            if let Some((last, acc)) = merged.last_mut()
                && *last == index
            {
                *acc += value;
            } else {
                merged.push((index, value));
            }
        }
        merged.retain(|&(_, v)| v != 0.0);
        Self {
            dim,
            entries: merged,
        }
    }

    /// Declared dimensionality (vocabulary size of the producing vectorizer).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }
}
