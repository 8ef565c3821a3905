//! Notice Storage
//! Mission: Durable notice records in SQLite, pinned-first newest-first

use crate::notices::models::{to_stored_precision, Notice, NoticeFields};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

const NOTICE_COLUMNS: &str = "id, title, body, category, posted_by, date_ms, pinned";

/// Notice storage with SQLite backend
///
/// A single connection behind an async mutex; every operation runs to
/// completion under the lock, so concurrent writes to the same id resolve
/// last-write-wins.
#[derive(Clone)]
pub struct NoticeStore {
    conn: Arc<Mutex<Connection>>,
}

impl NoticeStore {
    /// Open (or create) the store at `db_path`.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("open notice db at {}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory notice db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS notices (
                id TEXT PRIMARY KEY,
                title TEXT,
                body TEXT,
                category TEXT,
                posted_by TEXT,
                date_ms INTEGER NOT NULL,
                pinned INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )
        .context("create notices table")?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notices_board_order ON notices(pinned DESC, date_ms DESC)",
            [],
        )
        .context("create notices index")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new notice, filling `date` with now and `pinned` with false when absent.
    pub async fn insert(&self, fields: NoticeFields) -> Result<Notice> {
        let notice = Notice {
            id: Uuid::new_v4().to_string(),
            title: fields.title.flatten(),
            body: fields.body.flatten(),
            category: fields.category.flatten(),
            posted_by: fields.posted_by.flatten(),
            date: to_stored_precision(fields.date.unwrap_or_else(Utc::now)),
            pinned: fields.pinned.unwrap_or(false),
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO notices (id, title, body, category, posted_by, date_ms, pinned)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                notice.id,
                notice.title,
                notice.body,
                notice.category,
                notice.posted_by,
                notice.date.timestamp_millis(),
                notice.pinned,
            ],
        )
        .context("Failed to insert notice")?;

        info!("📌 Notice created: {} ({:?})", notice.id, notice.title);
        Ok(notice)
    }

    /// Merge the provided fields into the notice `id`.
    ///
    /// An explicit null text field clears the column; only absent fields keep
    /// their stored value. Returns the merged record, or `None` when no notice has that id; a
    /// missing id never creates a record.
    pub async fn update_by_id(&self, id: &str, fields: NoticeFields) -> Result<Option<Notice>> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE notices SET
                    title = CASE WHEN ?2 THEN ?3 ELSE title END,
                    body = CASE WHEN ?4 THEN ?5 ELSE body END,
                    category = CASE WHEN ?6 THEN ?7 ELSE category END,
                    posted_by = CASE WHEN ?8 THEN ?9 ELSE posted_by END,
                    date_ms = COALESCE(?10, date_ms),
                    pinned = COALESCE(?11, pinned)
                 WHERE id = ?1",
                params![
                    id,
                    fields.title.is_some(),
                    fields.title.flatten(),
                    fields.body.is_some(),
                    fields.body.flatten(),
                    fields.category.is_some(),
                    fields.category.flatten(),
                    fields.posted_by.is_some(),
                    fields.posted_by.flatten(),
                    fields.date.map(|d| d.timestamp_millis()),
                    fields.pinned,
                ],
            )
            .context("Failed to update notice")?;

        if changed == 0 {
            debug!("Update for unknown notice {}", id);
            return Ok(None);
        }

        let notice = Self::fetch(&conn, id)?;
        info!("✏️  Notice updated: {}", id);
        Ok(notice)
    }

    /// Remove the notice `id` if present. Deleting an unknown id is not an error.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute("DELETE FROM notices WHERE id = ?1", params![id])
            .context("Failed to delete notice")?;

        if removed == 0 {
            debug!("Delete for unknown notice {}", id);
        } else {
            info!("🗑️  Notice deleted: {}", id);
        }
        Ok(())
    }

    /// All notices, pinned first, then newest first.
    pub async fn list_sorted(&self) -> Result<Vec<Notice>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM notices ORDER BY pinned DESC, date_ms DESC, rowid DESC",
            NOTICE_COLUMNS
        ))?;

        let notices = stmt
            .query_map([], notice_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read notices")?;

        Ok(notices)
    }

    #[cfg(test)]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Notice>> {
        let conn = self.conn.lock().await;
        Self::fetch(&conn, id)
    }

    pub async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM notices", [], |row| row.get(0))
            .context("Failed to count notices")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn fetch(conn: &Connection, id: &str) -> Result<Option<Notice>> {
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM notices WHERE id = ?1",
            NOTICE_COLUMNS
        ))?;
        let notice = stmt
            .query_row(params![id], notice_from_row)
            .optional()
            .context("Failed to read notice")?;
        Ok(notice)
    }
}

fn notice_from_row(row: &Row<'_>) -> rusqlite::Result<Notice> {
    let date_ms: i64 = row.get(5)?;
    let date = DateTime::<Utc>::from_timestamp_millis(date_ms)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(5, date_ms))?;

    Ok(Notice {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        category: row.get(3)?,
        posted_by: row.get(4)?,
        date,
        pinned: row.get(6)?,
    })
}
