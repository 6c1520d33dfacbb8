//! Linear logistic classifier: fitted weights + bias, sigmoid link.

mod logistic;

pub use logistic::{sigmoid, ClassifierParameters, FitReport, LogisticClassifier};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary class of a URL. `Phishing` is the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Legitimate,
    Phishing,
}

impl Label {
    pub fn is_phishing(self) -> bool {
        self == Label::Phishing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Legitimate => "Legitimate",
            Label::Phishing => "Phishing",
        }
    }

    /// Parse a stored prediction or a corpus label (`legitimate`/`phishing`, `0`/`1`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("phishing") || s == "1" {
            Some(Label::Phishing)
        } else if s.eq_ignore_ascii_case("legitimate") || s == "0" {
            Some(Label::Legitimate)
        } else {
            None
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
