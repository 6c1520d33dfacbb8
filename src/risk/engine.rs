//! Maps a phishing probability to a risk score, severity tier, and label.
//! Buckets are upper-closed: exactly `high_threshold` is Medium, exactly
//! `medium_threshold` is Low. The label threshold is independent of the buckets.

use crate::config::RiskConfig;
use crate::error::ConfigError;
use crate::model::Label;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Severity::Low),
            "Medium" => Some(Severity::Medium),
            "High" => Some(Severity::High),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucketed risk for one probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBucket {
    pub risk: u8,
    pub severity: Severity,
}

#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self {
            config: RiskConfig::default(),
        }
    }
}

impl RiskEngine {
    /// Rejects thresholds that would make a tier unreachable.
    pub fn new(config: RiskConfig) -> Result<Self, ConfigError> {
        let (medium, high) = (config.medium_threshold, config.high_threshold);
        if !(0.0..=1.0).contains(&medium) || !(0.0..=1.0).contains(&high) || medium > high {
            return Err(ConfigError::Thresholds { medium, high });
        }
        Ok(Self { config })
    }

    pub fn bucketize(&self, p: f64) -> RiskBucket {
        if p > self.config.high_threshold {
            RiskBucket {
                risk: self.config.high_score,
                severity: Severity::High,
            }
        } else if p > self.config.medium_threshold {
            RiskBucket {
                risk: self.config.medium_score,
                severity: Severity::Medium,
            }
        } else {
            RiskBucket {
                risk: self.config.low_score,
                severity: Severity::Low,
            }
        }
    }

    /// Exactly `label_threshold` stays Legitimate.
    pub fn label(&self, p: f64) -> Label {
        if p > self.config.label_threshold {
            Label::Phishing
        } else {
            Label::Legitimate
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_match_thresholds() {
        let e = RiskEngine::default();
        assert_eq!(e.bucketize(0.9), RiskBucket { risk: 90, severity: Severity::High });
        assert_eq!(e.bucketize(0.6), RiskBucket { risk: 60, severity: Severity::Medium });
        assert_eq!(e.bucketize(0.1), RiskBucket { risk: 20, severity: Severity::Low });
        assert_eq!(e.bucketize(0.0).severity, Severity::Low);
        assert_eq!(e.bucketize(1.0).severity, Severity::High);
    }

    #[test]
    fn boundaries_are_upper_closed() {
        let e = RiskEngine::default();
        assert_eq!(e.bucketize(0.75).severity, Severity::Medium);
        assert_eq!(e.bucketize(0.4).severity, Severity::Low);
        assert_eq!(e.bucketize(0.750_000_001).severity, Severity::High);
        assert_eq!(e.bucketize(0.400_000_001).severity, Severity::Medium);
    }

    #[test]
    fn label_is_independent_of_severity() {
        let e = RiskEngine::default();
        assert_eq!(e.bucketize(0.45).severity, Severity::Medium);
        assert_eq!(e.bucketize(0.55).severity, Severity::Medium);
        assert_eq!(e.label(0.45), Label::Legitimate);
        assert_eq!(e.label(0.55), Label::Phishing);
        assert_eq!(e.label(0.5), Label::Legitimate);
        assert_eq!(e.bucketize(0.5).severity, Severity::Medium);
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let config = RiskConfig {
            high_threshold: 0.4,
            medium_threshold: 0.75,
            ..RiskConfig::default()
        };
        assert!(matches!(
            RiskEngine::new(config),
            Err(ConfigError::Thresholds { medium, high }) if medium == 0.75 && high == 0.4
        ));
        assert!(RiskEngine::new(RiskConfig {
            high_threshold: 1.5,
            ..RiskConfig::default()
        })
        .is_err());
        assert!(RiskEngine::new(RiskConfig::default()).is_ok());
    }

    #[test]
    fn severity_parse_round_trip() {
        for s in [Severity::Low, Severity::Medium, Severity::High] {
            assert_eq!(Severity::parse(s.as_str()), Some(s));
        }
        assert_eq!(Severity::parse("low"), None);
    }
}
