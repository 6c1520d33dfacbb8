//! Per-dimension standardization fitted once on a training corpus.

use super::FeatureVector;
use crate::error::{DimensionMismatch, TrainingError};
use serde::{Deserialize, Serialize};

/// Mean and spread (population standard deviation) per feature dimension.
/// A spread of 0.0 marks a constant dimension whose output is always 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParameters {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl NormalizationParameters {
    pub fn dim(&self) -> usize {
        self.mean.len()
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    params: NormalizationParameters,
}

impl Normalizer {
    pub fn new(params: NormalizationParameters) -> Self {
        Self { params }
    }

    /// Fit mean and spread over the corpus; all vectors must share the first one's dimension.
    pub fn fit(corpus: &[FeatureVector]) -> Result<Self, TrainingError> {
        let first = corpus.first().ok_or(TrainingError::EmptyCorpus)?;
        let dim = first.dim();
        for v in corpus {
            v.check_dim(dim)?;
        }

        let n = corpus.len() as f64;
        let mut mean = vec![0.0; dim];
        let mut scale = vec![0.0; dim];
        for d in 0..dim {
            let m = corpus.iter().map(|v| v.values[d]).sum::<f64>() / n;
            let constant = corpus.iter().all(|v| v.values[d] == first.values[d]);
            mean[d] = m;
            scale[d] = if constant {
                0.0
            } else {
                let var = corpus.iter().map(|v| (v.values[d] - m).powi(2)).sum::<f64>() / n;
                var.sqrt()
            };
        }

        Ok(Self::new(NormalizationParameters { mean, scale }))
    }

    pub fn params(&self) -> &NormalizationParameters {
        &self.params
    }

    pub fn dim(&self) -> usize {
        self.params.dim()
    }

    pub fn transform(&self, vector: &FeatureVector) -> Result<FeatureVector, DimensionMismatch> {
        vector.check_dim(self.dim())?;
        let values = vector
            .values
            .iter()
            .zip(self.params.mean.iter().zip(&self.params.scale))
            .map(|(&x, (&m, &s))| if s == 0.0 { 0.0 } else { (x - m) / s })
            .collect();
        Ok(FeatureVector::new(values))
    }

    pub fn transform_all(&self, vectors: &[FeatureVector]) -> Result<Vec<FeatureVector>, DimensionMismatch> {
        vectors.iter().map(|v| self.transform(v)).collect()
    }
}
