use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ownpad_core::{OwnpadError, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::provider::RecordStore;

const MIGRATE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS storage_records (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

fn db_err(e: rusqlite::Error) -> OwnpadError {
    OwnpadError::Persistence(e.to_string())
}

impl SqliteRecordStore {
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch(MIGRATE_SQL).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(db_err)?;
        tracing::debug!(path = %path.display(), "Opened record database");
        Self::new(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory().map_err(db_err)?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| OwnpadError::Persistence("record database lock poisoned".into()))
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM storage_records WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO storage_records (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.set("alice@example.org", "{}").await.unwrap();
        assert_eq!(
            store.get("alice@example.org").await.unwrap().as_deref(),
            Some("{}")
        );
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        assert_eq!(store.get("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_upserts() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.set("k", "old").await.unwrap();
        store.set("k", "new").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));

        let conn = store.lock().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM storage_records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
