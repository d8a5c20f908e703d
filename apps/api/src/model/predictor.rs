use std::sync::Arc;

use tracing::debug;

use super::{ModelError, TrainedArtifacts};

/// Cleaned text → category name, over shared read-only artifacts.
///
/// Cheap to clone; every clone reads the same artifacts without locking.
#[derive(Clone)]
pub struct CategoryPredictor {
    artifacts: Arc<TrainedArtifacts>,
}

impl CategoryPredictor {
    pub fn new(artifacts: Arc<TrainedArtifacts>) -> Self {
        Self { artifacts }
    }

    pub fn predict(&self, cleaned_text: &str) -> Result<String, ModelError> {
        let features = self.artifacts.vectorizer().transform(cleaned_text);
        let classifier = self.artifacts.classifier();

        // Never pad or truncate: a mismatch means the artifacts were not fitted together.
        if features.dimension() != classifier.n_features() {
            return Err(ModelError::PredictionError(format!(
                "vectorizer produced {} features, classifier expects {}",
                features.dimension(),
                classifier.n_features()
            )));
        }
        if features.is_zero() {
            debug!("No known vocabulary in text, classifying the zero vector");
        }

        let index = classifier.predict(&features)?;
        let label = self.artifacts.decoder().decode(index)?;
        Ok(label.to_string())
    }

    /// Every category the model can return, in class-index order.
    pub fn categories(&self) -> &[String] {
        self.artifacts.decoder().categories()
    }
}
