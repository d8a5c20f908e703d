//! TF-IDF vectorizer over a fitted vocabulary.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{FeatureVector, Vectorizer};

// Two or more word characters, the conventional TF-IDF token pattern.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk shape of `vectorizer.json`.
#[derive(Debug, Deserialize)]
struct TfidfArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: HashSet<String>,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_lowercase() -> bool {
    true
}

/// A fitted TF-IDF vectorizer. Terms outside the vocabulary are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TfidfArtifact")]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Option<Norm>,
    lowercase: bool,
}

impl TryFrom<TfidfArtifact> for TfidfVectorizer {
    type Error = String;

    fn try_from(a: TfidfArtifact) -> Result<Self, Self::Error> {
        if a.vocabulary.len() != a.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but idf has {} weights",
                a.vocabulary.len(),
                a.idf.len()
            ));
        }
        if let Some((term, idx)) = a.vocabulary.iter().find(|(_, &idx)| idx >= a.idf.len()) {
            return Err(format!(
                "term '{term}' maps to column {idx}, outside {} columns",
                a.idf.len()
            ));
        }
        let distinct: HashSet<usize> = a.vocabulary.values().copied().collect();
        if distinct.len() != a.vocabulary.len() {
            return Err("vocabulary maps several terms to the same column".to_string());
        }
        let (min_n, max_n) = a.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        Ok(Self {
            vocabulary: a.vocabulary,
            idf: a.idf,
            ngram_range: a.ngram_range,
            stop_words: a.stop_words,
            sublinear_tf: a.sublinear_tf,
            norm: a.norm,
            lowercase: a.lowercase,
        })
    }
}

impl TfidfVectorizer {
    /// Unigram, L2-normalised vectorizer with no stop words.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Result<Self, String> {
        Self::try_from(TfidfArtifact {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            stop_words: HashSet::new(),
            sublinear_tf: false,
            norm: default_norm(),
            lowercase: default_lowercase(),
        })
    }

    /// Raw term counts keyed by column.
    fn term_counts(&self, text: &str) -> BTreeMap<usize, f64> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = TOKEN
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let mut counts = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for gram in tokens.windows(n) {
                if let Some(&idx) = self.vocabulary.get(&gram.join(" ")) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }
        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> FeatureVector {
        let counts = self.term_counts(text);
        if counts.is_empty() {
            return FeatureVector::zeros(self.dimension());
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        let length = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, v)| v.abs()).sum(),
            None => 1.0,
        };
        if length > 0.0 {
            for (_, v) in &mut entries {
                *v /= length;
            }
        }

        FeatureVector::new(self.dimension(), entries)
    }
}
