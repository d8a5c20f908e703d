//! Trained-model inference: vectorize → classify → decode.
//!
//! The vectorizer and classifier sit behind traits so the predictor can run against any
//! fitted implementation (or a test fake). Concrete implementations read the JSON artifacts
//! exported by the training pipeline.

pub mod artifacts;
pub mod classifier;
pub mod label_decoder;
pub mod predictor;
pub mod vectorizer;

use thiserror::Error;

pub use artifacts::{ArtifactPaths, TrainedArtifacts};
pub use label_decoder::LabelDecoder;
pub use predictor::CategoryPredictor;

/// Operator-facing faults: retrying with a different document will not help.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{artifact} artifact not loaded from {path}: {reason}")]
    ArtifactNotLoaded {
        artifact: &'static str,
        path: String,
        reason: String,
    },

    #[error("Prediction failed: {0}")]
    PredictionError(String),
}

/// A sparse, fixed-dimension feature vector. Entries are sorted by column index with no
/// duplicates; absent columns are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Builds a vector from arbitrary entries, summing duplicate columns.
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(idx, _)| idx);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (idx, value) in entries {
            if let Some((last, acc)) = merged.last_mut() {
                if *last == idx {
                    *acc += value;
                    continue;
                }
            }
            merged.push((idx, value));
        }
        Self {
            dimension,
            entries: merged,
        }
    }

    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, v)| v == 0.0)
    }

    /// Dot product with a dense row. Columns beyond the row contribute nothing.
    pub fn dot_dense(&self, row: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(idx, v)| row.get(idx).map(|w| w * v))
            .sum()
    }

    /// Squared Euclidean distance to another sorted sparse row.
    pub fn squared_distance(&self, other: &[(usize, f64)]) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut total = 0.0;
        while i < self.entries.len() || j < other.len() {
            let diff = match (self.entries.get(i), other.get(j)) {
                (Some(&(a, x)), Some(&(b, y))) if a == b => {
                    i += 1;
                    j += 1;
                    x - y
                }
                (Some(&(a, x)), Some(&(b, _))) if a < b => {
                    i += 1;
                    x
                }
                (Some(&(_, x)), None) => {
                    i += 1;
                    x
                }
                (_, Some(&(_, y))) => {
                    j += 1;
                    -y
                }
                (None, None) => break,
            };
            total += diff * diff;
        }
        total
    }
}

/// Maps cleaned text onto the fitted feature space. Never learns at inference time.
pub trait Vectorizer: Send + Sync {
    fn dimension(&self) -> usize;
    fn transform(&self, text: &str) -> FeatureVector;
}

/// A fitted single-label classifier over a fixed feature space.
pub trait Classifier: Send + Sync {
    /// Feature dimensionality the model was fitted on.
    fn n_features(&self) -> usize;
    /// Every class index the model can emit.
    fn classes(&self) -> &[usize];
    fn predict(&self, features: &FeatureVector) -> Result<usize, ModelError>;
}

#[cfg(test)]
pub mod testing {
    //! Small hand-fitted artifacts shared by tests across the crate.

    use std::collections::HashMap;

    use super::classifier::LinearClassifier;
    use super::vectorizer::TfidfVectorizer;
    use super::{LabelDecoder, TrainedArtifacts};

    pub const VOCABULARY: [&str; 6] = ["data", "developer", "java", "nurse", "patient", "python"];

    pub fn vectorizer() -> TfidfVectorizer {
        let vocabulary: HashMap<String, usize> = VOCABULARY
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        TfidfVectorizer::new(vocabulary, vec![1.0; VOCABULARY.len()]).unwrap()
    }

    /// Three classes: 0 "Data Science" (data, python), 1 "Health and fitness"
    /// (nurse, patient), 2 "Java Developer" (developer, java). The intercept breaks ties
    /// towards "Java Developer".
    pub fn classifier() -> LinearClassifier {
        LinearClassifier::new(
            vec![
                vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
                vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
                vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0],
            ],
            vec![0.0, 0.0, 0.1],
            None,
        )
        .unwrap()
    }

    pub fn decoder() -> LabelDecoder {
        LabelDecoder::new(vec![
            "Data Science".to_string(),
            "Health and fitness".to_string(),
            "Java Developer".to_string(),
        ])
        .unwrap()
    }

    pub fn artifacts() -> TrainedArtifacts {
        TrainedArtifacts::new(Box::new(vectorizer()), Box::new(classifier()), decoder()).unwrap()
    }
}
