//! Loading and cross-checking the three trained artifacts.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::classifier::ClassifierArtifact;
use super::vectorizer::TfidfVectorizer;
use super::{Classifier, LabelDecoder, ModelError, Vectorizer};

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
    pub encoder: PathBuf,
}

/// The fitted vectorizer, classifier and label decoder, loaded once and never mutated.
///
/// Construction guarantees the three agree: the vectorizer's output dimension equals the
/// classifier's feature count, and every class the classifier can emit has a name.
pub struct TrainedArtifacts {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    decoder: LabelDecoder,
}

impl TrainedArtifacts {
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
        decoder: LabelDecoder,
    ) -> Result<Self, ModelError> {
        if vectorizer.dimension() != classifier.n_features() {
            return Err(ModelError::PredictionError(format!(
                "vectorizer produces {} features but classifier expects {}",
                vectorizer.dimension(),
                classifier.n_features()
            )));
        }
        if let Some(&class) = classifier.classes().iter().find(|&&c| c >= decoder.len()) {
            return Err(ModelError::PredictionError(format!(
                "classifier emits class {class} but label decoder knows {} categories",
                decoder.len()
            )));
        }

        Ok(Self {
            vectorizer,
            classifier,
            decoder,
        })
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ModelError> {
        let vectorizer: TfidfVectorizer = read_artifact("vectorizer", &paths.vectorizer)?;
        let classifier: ClassifierArtifact = read_artifact("classifier", &paths.classifier)?;
        let decoder: LabelDecoder = read_artifact("label decoder", &paths.encoder)?;

        let artifacts = Self::new(Box::new(vectorizer), classifier.into_classifier(), decoder)?;
        info!(
            features = artifacts.vectorizer.dimension(),
            categories = artifacts.decoder.len(),
            "Trained artifacts loaded"
        );
        Ok(artifacts)
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn decoder(&self) -> &LabelDecoder {
        &self.decoder
    }
}

fn read_artifact<T: DeserializeOwned>(artifact: &'static str, path: &Path) -> Result<T, ModelError> {
    let not_loaded = |reason: String| ModelError::ArtifactNotLoaded {
        artifact,
        path: path.display().to_string(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| not_loaded(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| not_loaded(e.to_string()))
}
