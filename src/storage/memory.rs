//! Volatile decision log for tests and embedding.

use super::{DecisionLog, DecisionRecord, NewDecision, RecordId};
use crate::error::StorageError;
use chrono::Utc;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryDecisionLog {
    records: Mutex<Vec<DecisionRecord>>,
}

impl MemoryDecisionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecisionLog for MemoryDecisionLog {
    fn append(&self, decision: &NewDecision) -> Result<RecordId, StorageError> {
        let mut records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        let id = RecordId(records.len() as i64 + 1);
        records.push(DecisionRecord::from_new(id, decision, Utc::now()));
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<DecisionRecord>, StorageError> {
        Ok(self.records.lock().map_err(|_| StorageError::Poisoned)?.clone())
    }
}
