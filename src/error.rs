//! Error taxonomy for the verdict pipeline.
//!
//! Structural errors (dimension mismatches) abort a request with a diagnostic.
//! Persistence errors are the only ones expected under normal operation and keep
//! the computed verdict so the caller can retry the write.

use crate::service::Verdict;
use thiserror::Error;

/// Rejected caller input. Never persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("url must not be empty")]
    EmptyUrl,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("risk thresholds must satisfy 0 <= medium ({medium}) <= high ({high}) <= 1")]
    Thresholds { medium: f64, high: f64 },
}

/// A feature vector disagrees with the fitted parameter length.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("feature dimension mismatch: expected {expected}, got {actual}")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("training corpus is empty")]
    EmptyCorpus,

    #[error("training corpus contains a single class only ({class})")]
    SingleClass { class: String },

    #[error("unknown label {value:?} at row {row}")]
    UnknownLabel { row: usize, value: String },

    #[error("labels ({labels}) do not match vectors ({vectors})")]
    LabelCount { vectors: usize, labels: usize },

    #[error(transparent)]
    Dimension(#[from] DimensionMismatch),

    #[error("cannot read training corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed training corpus: {0}")]
    Csv(#[from] csv::Error),

    #[error("solver hit a singular system at iteration {iteration}")]
    Singular { iteration: usize },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("decision log lock poisoned")]
    Poisoned,

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Dimension(#[from] DimensionMismatch),

    /// Verdict was computed but could not be written to the decision log.
    #[error("verdict computed but not persisted: {source}")]
    Persistence {
        verdict: Verdict,
        #[source]
        source: StorageError,
    },
}

impl ServiceError {
    /// The computed verdict, when the failure happened after scoring.
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            ServiceError::Persistence { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Persistence { .. })
    }
}
