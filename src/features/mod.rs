//! URL feature extraction and corpus-fitted normalization.

mod extractor;
mod normalizer;

pub use extractor::{extract, UrlFeatureExtractor, SUSPICIOUS_KEYWORDS};
pub use normalizer::{NormalizationParameters, Normalizer};

use crate::error::DimensionMismatch;
use serde::{Deserialize, Serialize};

/// Extractor outputs: length, "@" present, "-" present, keyword hits.
/// Changing this (or the keyword set) requires retraining.
pub const FEATURE_DIM: usize = 4;

/// Fixed-length numeric summary of a URL used as classifier input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Fails loudly instead of truncating or padding.
    pub fn check_dim(&self, expected: usize) -> Result<(), DimensionMismatch> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(DimensionMismatch {
                expected,
                actual: self.values.len(),
            })
        }
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
