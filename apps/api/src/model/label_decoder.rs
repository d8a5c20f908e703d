use std::collections::HashSet;

use serde::Deserialize;

use super::ModelError;

#[derive(Debug, Deserialize)]
struct EncoderArtifact {
    classes: Vec<String>,
}

/// Maps a predicted class index back to its category name (`classes[index]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "EncoderArtifact")]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl TryFrom<EncoderArtifact> for LabelDecoder {
    type Error = String;

    fn try_from(a: EncoderArtifact) -> Result<Self, Self::Error> {
        Self::new(a.classes)
    }
}

impl LabelDecoder {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("label decoder has no classes".to_string());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(format!("duplicate category '{dup}'"));
        }
        Ok(Self { classes })
    }

    pub fn decode(&self, index: usize) -> Result<&str, ModelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                ModelError::PredictionError(format!(
                    "class index {index} outside the {} known categories",
                    self.classes.len()
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn categories(&self) -> &[String] {
        &self.classes
    }
}
