use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::SharedThread;

pub const SHARE_DB_FILE: &str = "shares.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS shared_threads (
    share_id    TEXT PRIMARY KEY,
    thread_id   TEXT NOT NULL,
    thread_data TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_shared_threads_expires_at ON shared_threads (expires_at);";

/// SQLite-backed store of share snapshots
pub struct ShareStore {
    conn: Mutex<Connection>,
}

impl ShareStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Unknown("Share store lock poisoned".to_string()))
    }

    pub fn insert(&self, share: &SharedThread) -> AppResult<()> {
        let thread_data = serde_json::to_string(&share.thread_data)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO shared_threads (share_id, thread_id, thread_data, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                share.share_id,
                share.thread_id,
                thread_data,
                format_timestamp(&share.created_at),
                format_timestamp(&share.expires_at),
            ],
        )?;
        Ok(())
    }

    /// Expired rows are still returned; callers decide how to report them
    pub fn get(&self, share_id: &str) -> AppResult<Option<SharedThread>> {
        let row = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT share_id, thread_id, thread_data, created_at, expires_at
                 FROM shared_threads WHERE share_id = ?1",
                params![share_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?
        };

        let Some((share_id, thread_id, thread_data, created_at, expires_at)) = row else {
            return Ok(None);
        };

        Ok(Some(SharedThread {
            share_id,
            thread_id,
            thread_data: serde_json::from_str(&thread_data)?,
            created_at: parse_timestamp(&created_at)?,
            expires_at: parse_timestamp(&expires_at)?,
        }))
    }

    /// Delete snapshots whose expiry lies before `now`, returning how many were removed
    pub fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM shared_threads WHERE expires_at < ?1",
            params![format_timestamp(&now)],
        )?;
        Ok(removed)
    }
}

/// Fixed-width UTC form, so lexical order in SQL matches time order
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Unknown(format!("Invalid timestamp {:?}: {}", raw, e)))
}
