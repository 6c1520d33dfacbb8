//! Offline training: corpus → features → fitted normalizer → fitted classifier.

use super::LabeledUrl;
use crate::config::TrainingConfig;
use crate::error::{DimensionMismatch, TrainingError};
use crate::features::{FeatureVector, Normalizer, UrlFeatureExtractor};
use crate::model::{Label, LogisticClassifier};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Fitted serving artifacts. Immutable once built; share behind `Arc`.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    normalizer: Normalizer,
    classifier: LogisticClassifier,
}

impl TrainedModel {
    pub fn new(normalizer: Normalizer, classifier: LogisticClassifier) -> Result<Self, DimensionMismatch> {
        if normalizer.dim() != classifier.dim() {
            return Err(DimensionMismatch {
                expected: normalizer.dim(),
                actual: classifier.dim(),
            });
        }
        Ok(Self { normalizer, classifier })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &LogisticClassifier {
        &self.classifier
    }

    /// Normalize a raw vector and return the phishing probability.
    pub fn probability(&self, raw: &FeatureVector) -> Result<f64, DimensionMismatch> {
        let normalized = self.normalizer.transform(raw)?;
        self.classifier.predict(&normalized)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub phishing: usize,
    pub legitimate: usize,
    pub iterations: usize,
    pub converged: bool,
    /// Training-set accuracy at p > 0.5
    pub accuracy: f64,
    /// Mean training-set log-loss
    pub log_loss: f64,
}

pub struct TrainingPipeline {
    config: TrainingConfig,
    extractor: UrlFeatureExtractor,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            extractor: UrlFeatureExtractor::new(),
        }
    }

    pub fn run_csv(&self, path: &Path) -> Result<(TrainedModel, TrainingReport), TrainingError> {
        let corpus = super::load_corpus_path(path)?;
        info!(path = %path.display(), rows = corpus.len(), "training corpus loaded");
        self.run(&corpus)
    }

    pub fn run(&self, corpus: &[LabeledUrl]) -> Result<(TrainedModel, TrainingReport), TrainingError> {
        let raw = self.extractor.extract_all(corpus.iter().map(|s| s.url.as_str()));
        let labels: Vec<Label> = corpus.iter().map(|s| s.label).collect();

        let normalizer = Normalizer::fit(&raw)?;
        let normalized = normalizer.transform_all(&raw)?;
        let (classifier, fit) = LogisticClassifier::fit(&normalized, &labels, &self.config)?;

        let mut correct = 0usize;
        let mut loss = 0.0;
        for (v, label) in normalized.iter().zip(&labels) {
            let p = classifier.predict(v)?;
            if (p > 0.5) == label.is_phishing() {
                correct += 1;
            }
            loss -= if label.is_phishing() { p.ln() } else { (1.0 - p).ln() };
        }

        let phishing = labels.iter().filter(|l| l.is_phishing()).count();
        let report = TrainingReport {
            samples: corpus.len(),
            phishing,
            legitimate: corpus.len() - phishing,
            iterations: fit.iterations,
            converged: fit.converged,
            accuracy: correct as f64 / corpus.len() as f64,
            log_loss: loss / corpus.len() as f64,
        };
        info!(
            samples = report.samples,
            phishing = report.phishing,
            legitimate = report.legitimate,
            iterations = report.iterations,
            converged = report.converged,
            accuracy = report.accuracy,
            log_loss = report.log_loss,
            "model trained"
        );

        let model = TrainedModel::new(normalizer, classifier)?;
        Ok((model, report))
    }
}

impl Default for TrainingPipeline {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}
