//! Risk scoring: probability → risk score, severity tier, label.

mod engine;

pub use engine::{RiskBucket, RiskEngine, Severity};
