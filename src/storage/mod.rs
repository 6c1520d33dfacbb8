//! Append-only decision log behind a narrow interface, with a durable SQLite
//! backend and an in-memory one for tests.

mod memory;
mod sqlite;

pub use memory::MemoryDecisionLog;
pub use sqlite::SqliteDecisionLog;

use crate::error::StorageError;
use crate::model::Label;
use crate::risk::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log-assigned identity: strictly increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decision about to be written; the log assigns the id and the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDecision {
    pub url: String,
    pub label: Label,
    pub risk: u8,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: RecordId,
    pub url: String,
    pub label: Label,
    pub risk: u8,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl DecisionRecord {
    pub(crate) fn from_new(id: RecordId, d: &NewDecision, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            url: d.url.clone(),
            label: d.label,
            risk: d.risk,
            severity: d.severity,
            created_at,
        }
    }
}

pub trait DecisionLog: Send + Sync {
    /// Write one record atomically and return its id. The timestamp is taken
    /// while writes are serialized, so time order matches id order.
    fn append(&self, decision: &NewDecision) -> Result<RecordId, StorageError>;

    /// Every record, oldest first.
    fn list_all(&self) -> Result<Vec<DecisionRecord>, StorageError>;
}
