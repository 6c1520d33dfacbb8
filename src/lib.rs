//! phishguard: phishing URL verdict pipeline.
//!
//! Modular structure:
//! - [`features`]: URL feature extraction and normalization
//! - [`model`]: Logistic classifier
//! - [`risk`]: Probability → risk score, severity, label
//! - [`training`]: Offline fit from a labeled corpus
//! - [`storage`]: Append-only decision log
//! - [`service`]: Per-request orchestration
//! - [`logging`]: Structured logging

pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod risk;
pub mod training;
pub mod storage;
pub mod service;
pub mod logging;

pub use config::AppConfig;
pub use error::{ConfigError, DimensionMismatch, InputError, ServiceError, StorageError, TrainingError};
pub use features::{extract, FeatureVector, Normalizer};
pub use model::{Label, LogisticClassifier};
pub use risk::{RiskEngine, Severity};
pub use training::{TrainedModel, TrainingPipeline};
pub use storage::{DecisionLog, MemoryDecisionLog, SqliteDecisionLog};
pub use service::{HistoryEntry, Verdict, VerdictService};
pub use logging::StructuredLogger;
