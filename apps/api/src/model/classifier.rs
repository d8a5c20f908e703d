//! Fitted classifiers readable from `classifier.json`.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{Classifier, FeatureVector, ModelError};

/// On-disk classifier, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear(LinearClassifier),
    KNeighbors(KNeighborsClassifier),
}

impl ClassifierArtifact {
    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            Self::Linear(model) => Box::new(model),
            Self::KNeighbors(model) => Box::new(model),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Linear model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LinearArtifact {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default)]
    classes: Option<Vec<usize>>,
}

/// One-vs-rest linear decision function: `argmax(coef · x + intercept)`.
///
/// A single coefficient row is a binary model whose positive side selects `classes[1]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "LinearArtifact")]
pub struct LinearClassifier {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    classes: Vec<usize>,
    n_features: usize,
}

impl TryFrom<LinearArtifact> for LinearClassifier {
    type Error = String;

    fn try_from(a: LinearArtifact) -> Result<Self, Self::Error> {
        Self::new(a.coef, a.intercept, a.classes)
    }
}

impl LinearClassifier {
    pub fn new(
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Option<Vec<usize>>,
    ) -> Result<Self, String> {
        let n_features = match coef.first() {
            Some(row) => row.len(),
            None => return Err("coef has no rows".to_string()),
        };
        if coef.iter().any(|row| row.len() != n_features) {
            return Err("coef rows differ in length".to_string());
        }
        if intercept.len() != coef.len() {
            return Err(format!(
                "intercept has {} entries for {} coef rows",
                intercept.len(),
                coef.len()
            ));
        }

        let n_classes = if coef.len() == 1 { 2 } else { coef.len() };
        let classes = classes.unwrap_or_else(|| (0..n_classes).collect());
        if classes.len() != n_classes {
            return Err(format!(
                "expected {n_classes} classes for {} coef rows, got {}",
                coef.len(),
                classes.len()
            ));
        }

        Ok(Self {
            coef,
            intercept,
            classes,
            n_features,
        })
    }

    fn decision(&self, features: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| features.dot_dense(row) + b)
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<usize, ModelError> {
        check_dimension(features, self.n_features)?;
        let scores = self.decision(features);

        let winner = if let [score] = scores.as_slice() {
            usize::from(*score > 0.0)
        } else {
            // first maximum wins ties
            let mut best = 0;
            for (i, &s) in scores.iter().enumerate().skip(1) {
                if s > scores[best] {
                    best = i;
                }
            }
            best
        };
        Ok(self.classes[winner])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// k-nearest neighbours
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct KNeighborsArtifact {
    n_neighbors: usize,
    n_features: usize,
    samples: Vec<Vec<(usize, f64)>>,
    targets: Vec<usize>,
}

/// Uniform-vote k-nearest-neighbour classifier over stored sparse training rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "KNeighborsArtifact")]
pub struct KNeighborsClassifier {
    n_neighbors: usize,
    n_features: usize,
    samples: Vec<Vec<(usize, f64)>>,
    targets: Vec<usize>,
    classes: Vec<usize>,
}

impl TryFrom<KNeighborsArtifact> for KNeighborsClassifier {
    type Error = String;

    fn try_from(a: KNeighborsArtifact) -> Result<Self, Self::Error> {
        Self::new(a.n_neighbors, a.n_features, a.samples, a.targets)
    }
}

impl KNeighborsClassifier {
    pub fn new(
        n_neighbors: usize,
        n_features: usize,
        samples: Vec<Vec<(usize, f64)>>,
        targets: Vec<usize>,
    ) -> Result<Self, String> {
        if n_neighbors == 0 {
            return Err("n_neighbors must be at least 1".to_string());
        }
        if samples.is_empty() || samples.len() != targets.len() {
            return Err(format!(
                "{} samples but {} targets",
                samples.len(),
                targets.len()
            ));
        }
        let samples: Vec<Vec<(usize, f64)>> = samples
            .into_iter()
            .map(|row| FeatureVector::new(n_features, row).entries().to_vec())
            .collect();
        if let Some(idx) = samples.iter().flatten().map(|&(i, _)| i).find(|&i| i >= n_features) {
            return Err(format!("sample column {idx} outside {n_features} features"));
        }

        let mut classes = targets.clone();
        classes.sort_unstable();
        classes.dedup();

        Ok(Self {
            n_neighbors,
            n_features,
            samples,
            targets,
            classes,
        })
    }
}

impl Classifier for KNeighborsClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<usize, ModelError> {
        check_dimension(features, self.n_features)?;

        let mut distances: Vec<(f64, usize)> = self
            .samples
            .iter()
            .zip(&self.targets)
            .map(|(row, &target)| (features.squared_distance(row), target))
            .collect();
        // stable: equally distant samples keep training order
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
        for &(_, target) in distances.iter().take(self.n_neighbors) {
            *votes.entry(target).or_insert(0) += 1;
        }

        // BTreeMap iterates ascending, so the smallest class wins a tied vote.
        let mut best: Option<(usize, usize)> = None;
        for (class, count) in votes {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class)
            .ok_or_else(|| ModelError::PredictionError("no neighbours to vote".to_string()))
    }
}

fn check_dimension(features: &FeatureVector, expected: usize) -> Result<(), ModelError> {
    if features.dimension() != expected {
        return Err(ModelError::PredictionError(format!(
            "feature vector has {} dimensions, classifier expects {expected}",
            features.dimension()
        )));
    }
    Ok(())
}
