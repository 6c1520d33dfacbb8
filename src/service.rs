//! Verdict service: extract → normalize → classify → bucketize → label → persist.
//!
//! Model artifacts are injected at construction and only read afterwards, so one
//! service can be shared across threads behind an `Arc`. The decision log is the
//! only mutable state.

use crate::error::{InputError, ServiceError, StorageError};
use crate::features::extract;
use crate::model::Label;
use crate::risk::{RiskEngine, Severity};
use crate::storage::{DecisionLog, DecisionRecord, NewDecision, RecordId};
use crate::training::TrainedModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scoring result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,
    pub risk: u8,
    pub severity: Severity,
    /// Phishing probability rounded to 2 decimals
    pub confidence: f64,
}

/// One row of the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub risk: u8,
    pub severity: Severity,
    pub time: DateTime<Utc>,
}

impl From<DecisionRecord> for HistoryEntry {
    fn from(r: DecisionRecord) -> Self {
        Self {
            url: r.url,
            risk: r.risk,
            severity: r.severity,
            time: r.created_at,
        }
    }
}

/// Two decimals, exact halves away from zero (0.125 -> 0.13), not half-to-even.
fn round2(p: f64) -> f64 {
    (p * 100.0).round() / 100.0
}

pub struct VerdictService {
    model: Arc<TrainedModel>,
    risk: RiskEngine,
    log: Arc<dyn DecisionLog>,
}

impl VerdictService {
    pub fn new(model: Arc<TrainedModel>, risk: RiskEngine, log: Arc<dyn DecisionLog>) -> Self {
        Self { model, risk, log }
    }

    /// Compute a verdict without touching the decision log.
    pub fn score(&self, url: &str) -> Result<Verdict, ServiceError> {
        if url.is_empty() {
            return Err(InputError::EmptyUrl.into());
        }
        let p = self.model.probability(&extract(url))?;
        let bucket = self.risk.bucketize(p);
        Ok(Verdict {
            label: self.risk.label(p),
            risk: bucket.risk,
            severity: bucket.severity,
            confidence: round2(p),
        })
    }

    /// Score and append exactly one decision record. On a storage failure the
    /// computed verdict is returned inside `ServiceError::Persistence`.
    pub fn evaluate(&self, url: &str) -> Result<Verdict, ServiceError> {
        let verdict = self.score(url)?;
        match self.record(url, &verdict) {
            Ok(id) => {
                debug!(%id, url, label = %verdict.label, risk = verdict.risk, "verdict recorded");
                if verdict.label.is_phishing() {
                    info!(%id, url, severity = %verdict.severity, confidence = verdict.confidence, "phishing url");
                }
                Ok(verdict)
            }
            Err(source) => {
                warn!(url, error = %source, "decision log write failed");
                Err(ServiceError::Persistence { verdict, source })
            }
        }
    }

    /// Persist an already computed verdict; used by `evaluate` and for caller retries.
    pub fn record(&self, url: &str, verdict: &Verdict) -> Result<RecordId, StorageError> {
        self.log.append(&NewDecision {
            url: url.to_string(),
            label: verdict.label,
            risk: verdict.risk,
            severity: verdict.severity,
        })
    }

    /// Full decision log, oldest first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        Ok(self.log.list_all()?.into_iter().map(HistoryEntry::from).collect())
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DimensionMismatch;
    use crate::features::{NormalizationParameters, Normalizer};
    use crate::model::{ClassifierParameters, LogisticClassifier};
    use crate::storage::MemoryDecisionLog;

    #[test]
    fn confidence_halves_round_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.994), 0.99);
    }

    /// Identity normalization; score driven by keyword count only.
    fn keyword_model(weight: f64, bias: f64) -> Arc<TrainedModel> {
        let normalizer = Normalizer::new(NormalizationParameters {
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        });
        let classifier = LogisticClassifier::new(ClassifierParameters {
            weights: vec![0.0, 0.0, 0.0, weight],
            bias,
        });
        Arc::new(TrainedModel::new(normalizer, classifier).unwrap())
    }

    fn service_with(model: Arc<TrainedModel>, log: Arc<dyn DecisionLog>) -> VerdictService {
        VerdictService::new(model, RiskEngine::default(), log)
    }

    struct FailingLog;

    impl DecisionLog for FailingLog {
        fn append(&self, _: &NewDecision) -> Result<RecordId, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn list_all(&self) -> Result<Vec<DecisionRecord>, StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    #[test]
    fn evaluate_appends_one_record() {
        let log = Arc::new(MemoryDecisionLog::new());
        let svc = service_with(keyword_model(2.0, -3.0), log.clone());
        let v = svc.evaluate("http://secure-login@bank.com").unwrap();
        assert_eq!(v.label, Label::Phishing);
        assert_eq!(v.severity, Severity::High);
        assert_eq!(v.risk, 90);
        assert_eq!(v.confidence, 0.95);

        let records = log.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "http://secure-login@bank.com");
        assert_eq!(records[0].label, Label::Phishing);
    }

    #[test]
    fn zero_logit_is_legitimate_but_medium() {
        let svc = service_with(keyword_model(0.0, 0.0), Arc::new(MemoryDecisionLog::new()));
        let v = svc.score("http://example.com").unwrap();
        assert_eq!(v.confidence, 0.5);
        assert_eq!(v.label, Label::Legitimate);
        assert_eq!(v.severity, Severity::Medium);
    }

    #[test]
    fn same_url_same_verdict() {
        let svc = service_with(keyword_model(1.3, -2.1), Arc::new(MemoryDecisionLog::new()));
        let a = svc.evaluate("http://verify-update.example").unwrap();
        let b = svc.evaluate("http://verify-update.example").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_url_rejected_and_not_persisted() {
        let log = Arc::new(MemoryDecisionLog::new());
        let svc = service_with(keyword_model(1.0, 0.0), log.clone());
        assert!(matches!(
            svc.evaluate(""),
            Err(ServiceError::Input(InputError::EmptyUrl))
        ));
        assert!(log.list_all().unwrap().is_empty());
    }

    #[test]
    fn dimension_mismatch_aborts_before_persisting() {
        let normalizer = Normalizer::new(NormalizationParameters {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        });
        let classifier = LogisticClassifier::new(ClassifierParameters {
            weights: vec![1.0; 3],
            bias: 0.0,
        });
        let model = Arc::new(TrainedModel::new(normalizer, classifier).unwrap());
        let log = Arc::new(MemoryDecisionLog::new());
        let svc = service_with(model, log.clone());
        let err = svc.evaluate("http://a.com").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Dimension(DimensionMismatch { expected: 3, actual: 4 })
        ));
        assert!(log.list_all().unwrap().is_empty());
    }

    #[test]
    fn persistence_failure_keeps_verdict() {
        let svc = service_with(keyword_model(2.0, -3.0), Arc::new(FailingLog));
        let expected = svc.score("http://bank-login.com").unwrap();
        let err = svc.evaluate("http://bank-login.com").unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.verdict(), Some(&expected));
        assert!(svc.history().is_err());
    }

    #[test]
    fn record_retry_appends_computed_verdict() {
        let log = Arc::new(MemoryDecisionLog::new());
        let svc = service_with(keyword_model(2.0, -3.0), log.clone());
        let v = svc.score("http://bank.com").unwrap();
        let id = svc.record("http://bank.com", &v).unwrap();
        let history = svc.history().unwrap();
        assert_eq!(id, RecordId(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].risk, v.risk);
        assert_eq!(history[0].severity, v.severity);
    }

    #[test]
    fn verdict_serializes_with_plain_names() {
        let v = Verdict {
            label: Label::Phishing,
            risk: 60,
            severity: Severity::Medium,
            confidence: 0.55,
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"label": "Phishing", "risk": 60, "severity": "Medium", "confidence": 0.55})
        );
    }
}
