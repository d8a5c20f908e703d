use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::model::ArtifactPaths;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub artifact_dir: PathBuf,
    pub vectorizer_file: String,
    pub classifier_file: String,
    pub encoder_file: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            artifact_dir: PathBuf::from(var("ARTIFACT_DIR", "artifacts")),
            vectorizer_file: var("VECTORIZER_FILE", "vectorizer.json"),
            classifier_file: var("CLASSIFIER_FILE", "classifier.json"),
            encoder_file: var("ENCODER_FILE", "encoder.json"),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: var("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            vectorizer: self.artifact_dir.join(&self.vectorizer_file),
            classifier: self.artifact_dir.join(&self.classifier_file),
            encoder: self.artifact_dir.join(&self.encoder_file),
        }
    }
}
