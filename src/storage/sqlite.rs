//! SQLite-backed decision log. One connection behind a mutex serializes writers in
//! this process; `busy_timeout` bounds waits on other processes holding the file.

use super::{DecisionLog, DecisionRecord, NewDecision, RecordId};
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::model::Label;
use crate::risk::Severity;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS decisions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL,
        prediction TEXT NOT NULL,
        risk INTEGER NOT NULL,
        severity TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

pub struct SqliteDecisionLog {
    conn: Mutex<Connection>,
}

impl SqliteDecisionLog {
    /// Open or create the log at path. Schema creation is idempotent.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "decision log opened");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    pub fn len(&self) -> Result<u64, StorageError> {
        let n: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM decisions", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl DecisionLog for SqliteDecisionLog {
    fn append(&self, decision: &NewDecision) -> Result<RecordId, StorageError> {
        let conn = self.lock()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO decisions (url, prediction, risk, severity, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                decision.url,
                decision.label.as_str(),
                decision.risk,
                decision.severity.as_str(),
                created_at,
            ],
        )?;
        Ok(RecordId(conn.last_insert_rowid()))
    }

    fn list_all(&self) -> Result<Vec<DecisionRecord>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, url, prediction, risk, severity, created_at FROM decisions ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, DateTime<Utc>>(5)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, url, prediction, risk, severity, created_at) = row?;
            let label = Label::parse(&prediction).ok_or_else(|| StorageError::Corrupt {
                id,
                reason: format!("unknown prediction {prediction:?}"),
            })?;
            let severity = Severity::parse(&severity).ok_or_else(|| StorageError::Corrupt {
                id,
                reason: format!("unknown severity {severity:?}"),
            })?;
            out.push(DecisionRecord {
                id: RecordId(id),
                url,
                label,
                risk,
                severity,
                created_at,
            });
        }
        Ok(out)
    }
}
