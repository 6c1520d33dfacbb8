//! Pipeline configuration. Defaults reproduce the production thresholds exactly.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Data directory (decision log)
    pub data_dir: PathBuf,
    /// Labeled training corpus (CSV with `url` and `label` columns)
    pub corpus_path: PathBuf,
    /// Classifier fitting parameters
    pub training: TrainingConfig,
    /// Risk bucket thresholds and scores
    pub risk: RiskConfig,
    /// Decision log storage
    pub storage: StorageConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Inverse L2 regularization strength (C); larger means weaker penalty
    pub inverse_regularization: f64,
    /// Newton iterations before giving up on convergence
    pub max_iterations: usize,
    /// Stop when the largest parameter step falls below this
    pub tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Probability strictly above this is high risk
    pub high_threshold: f64,
    /// Probability strictly above this (and not high) is medium risk
    pub medium_threshold: f64,
    /// Probability strictly above this is labeled phishing
    pub label_threshold: f64,
    pub high_score: u8,
    pub medium_score: u8,
    pub low_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file name under `data_dir`
    pub file_name: String,
    /// How long a write waits on a locked database before failing
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".phishguard"),
            corpus_path: PathBuf::from("phishing_dataset.csv"),
            training: TrainingConfig::default(),
            risk: RiskConfig::default(),
            storage: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            inverse_regularization: 1.0,
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.75,
            medium_threshold: 0.4,
            label_threshold: 0.5,
            high_score: 90,
            medium_score: 60,
            low_score: 20,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_name: "decisions.db".to_string(),
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl AppConfig {
    /// `Ok(None)` when the file does not exist.
    pub fn try_load(path: &std::path::Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Load from JSON file if present; otherwise return default. A file that
    /// cannot be read or parsed is logged and replaced by the default.
    pub fn load(path: &std::path::Path) -> Self {
        match Self::try_load(path) {
            Ok(c) => c.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "config ignored; using defaults");
                Self::default()
            }
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let c: AppConfig = serde_json::from_str(r#"{"risk":{"high_threshold":0.8}}"#).unwrap();
        assert_eq!(c.risk.high_threshold, 0.8);
        assert_eq!(c.risk.medium_threshold, 0.4);
        assert_eq!(c.training.max_iterations, 100);
        assert_eq!(c.storage.file_name, "decisions.db");
    }

    #[test]
    fn malformed_file_reports_error_and_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppConfig::try_load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(AppConfig::load(&path).risk.high_threshold, 0.75);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::try_load(&dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn store_path_joins_data_dir() {
        let c = AppConfig::default();
        assert_eq!(c.store_path(), PathBuf::from(".phishguard/decisions.db"));
    }
}
