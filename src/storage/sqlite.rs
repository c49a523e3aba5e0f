//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the FrontierStore trait.

use crate::state::{Clock, UrlStatus};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{FrontierStore, StorageError, StorageResult, UrlIter};
use crate::storage::{LinkOutcome, LinkRecord, UpsertOutcome, UrlRecord};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

/// Number of rows fetched per page by `list_all_urls`
const LISTING_PAGE_SIZE: i64 = 256;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    clock: Arc<dyn Clock>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `clock` - Time source for `created`/`updated` timestamps
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;
        tracing::debug!("Opened frontier database at {}", path.display());

        Ok(Self { conn, clock })
    }

    /// Creates an in-memory database
    ///
    /// Not limited to `cfg(test)` so integration tests can use it too.
    pub fn open_in_memory(clock: Arc<dyn Clock>) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn, clock })
    }

    /// Closes the database, flushing anything still pending
    pub fn close(self) -> StorageResult<()> {
        self.conn.close().map_err(|(_, e)| StorageError::from(e))
    }
}

impl FrontierStore for SqliteStorage {
    // ===== URL Records =====

    fn upsert_url(&mut self, url: &str, status: UrlStatus) -> StorageResult<UpsertOutcome> {
        let now = self.clock.now();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO urls (url, status, created, updated) VALUES (?1, ?2, ?3, ?3)",
            params![url, status.to_db_string(), now],
        )?;

        let outcome = if inserted == 1 {
            UpsertOutcome::Inserted
        } else {
            // The URL exists: fall back to updating it in the same transaction
            let updated = tx.execute(
                "UPDATE urls SET status = ?1, updated = MAX(created, ?2) WHERE url = ?3",
                params![status.to_db_string(), now, url],
            );

            match updated {
                Ok(1) => UpsertOutcome::Updated,
                Ok(_) => {
                    tracing::warn!("URL {} - neither inserted nor updated", url);
                    return Ok(UpsertOutcome::Abandoned);
                }
                Err(e) if is_constraint_violation(&e) => {
                    tracing::warn!("URL {} - could not be updated: {}", url, e);
                    return Ok(UpsertOutcome::Abandoned);
                }
                Err(e) => return Err(e.into()),
            }
        };

        tx.commit()?;
        tracing::debug!("URL {} - {:?} as {}", url, outcome, status);
        Ok(outcome)
    }

    fn finalize_url(
        &mut self,
        url: &str,
        digest: Option<&str>,
        status: UrlStatus,
    ) -> StorageResult<bool> {
        let now = self.clock.now();
        let tx = self.conn.transaction()?;

        let result = match digest.filter(|d| !d.is_empty()) {
            Some(digest) => tx.execute(
                "UPDATE urls SET digest = ?1, status = ?2, updated = MAX(created, ?3) WHERE url = ?4",
                params![digest, status.to_db_string(), now, url],
            ),
            None => tx.execute(
                "UPDATE urls SET status = ?1, updated = MAX(created, ?2) WHERE url = ?3",
                params![status.to_db_string(), now, url],
            ),
        };

        let changed = match result {
            Ok(changed) => changed,
            Err(e) if is_constraint_violation(&e) => {
                tracing::warn!("URL {} - could not be updated: {}", url, e);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit()?;
        Ok(changed == 1)
    }

    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, url, status, digest, created, updated FROM urls WHERE url = ?1",
        )?;

        let row = stmt
            .query_row(params![url], |row| {
                Ok(RawUrlRow {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    status: row.get(2)?,
                    digest: row.get(3)?,
                    created: row.get(4)?,
                    updated: row.get(5)?,
                })
            })
            .optional()?;

        row.map(RawUrlRow::into_record).transpose()
    }

    fn list_all_urls(&self) -> UrlIter<'_> {
        Box::new(UrlListing {
            conn: &self.conn,
            last_id: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        })
    }

    fn first_with_status(
        &self,
        status: UrlStatus,
        updated_before: Option<i64>,
        accept: &mut dyn FnMut(&str) -> bool,
    ) -> StorageResult<Option<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT url FROM urls WHERE status = ?1 AND updated < ?2 ORDER BY updated ASC, id ASC",
        )?;

        let cutoff = updated_before.unwrap_or(i64::MAX);
        let mut rows = stmt.query(params![status.to_db_string(), cutoff])?;

        while let Some(row) = rows.next()? {
            let url: String = row.get(0)?;
            if accept(&url) {
                return Ok(Some(url));
            }
        }

        Ok(None)
    }

    // ===== Link Management =====

    fn add_link(&mut self, parent_url: &str, link: &str) -> StorageResult<LinkOutcome> {
        let tx = self.conn.transaction()?;

        let parent_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM urls WHERE url = ?1",
                params![parent_url],
                |row| row.get(0),
            )
            .optional()?;

        let Some(parent_id) = parent_id else {
            tracing::warn!("Link {} - parent URL {} has no record", link, parent_url);
            return Ok(LinkOutcome::ParentMissing);
        };

        let exists = tx
            .query_row(
                "SELECT 1 FROM links WHERE url_id = ?1 AND link = ?2",
                params![parent_id, link],
                |_| Ok(()),
            )
            .optional()?
            .is_some();

        if exists {
            return Ok(LinkOutcome::AlreadyPresent);
        }

        match tx.execute(
            "INSERT INTO links (url_id, link) VALUES (?1, ?2)",
            params![parent_id, link],
        ) {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                tracing::warn!("Link {} - could not be added: {}", link, e);
                return Ok(LinkOutcome::Abandoned);
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit()?;
        tracing::debug!("Link {} added to {}", link, parent_url);
        Ok(LinkOutcome::Added)
    }

    fn outgoing_links(&self, parent_url: &str) -> StorageResult<Vec<LinkRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT links.url_id, links.link FROM links
             JOIN urls ON urls.id = links.url_id
             WHERE urls.url = ?1
             ORDER BY links.rowid",
        )?;

        let links = stmt
            .query_map(params![parent_url], |row| {
                Ok(LinkRecord {
                    parent_id: row.get(0)?,
                    link: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    // ===== Statistics =====

    fn count_urls(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_urls_by_status(&self, status: UrlStatus) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM urls WHERE status = ?1",
            params![status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_links(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// A `urls` row before its columns are checked
struct RawUrlRow {
    id: i64,
    url: String,
    status: String,
    digest: Option<String>,
    created: i64,
    updated: i64,
}

impl RawUrlRow {
    fn into_record(self) -> StorageResult<UrlRecord> {
        let status = UrlStatus::from_db_string(&self.status).ok_or_else(|| {
            StorageError::Corrupt(format!("unknown status '{}' for {}", self.status, self.url))
        })?;

        Ok(UrlRecord {
            id: self.id,
            status,
            digest: self.digest,
            created: timestamp(self.created, &self.url)?,
            updated: timestamp(self.updated, &self.url)?,
            url: self.url,
        })
    }
}

fn timestamp(seconds: i64, url: &str) -> StorageResult<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| StorageError::Corrupt(format!("timestamp {} out of range for {}", seconds, url)))
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

/// Keyset-paginated walk over the `urls` table
struct UrlListing<'a> {
    conn: &'a Connection,
    last_id: i64,
    buffer: VecDeque<String>,
    exhausted: bool,
}

impl UrlListing<'_> {
    fn fill(&mut self) -> StorageResult<()> {
        let conn = self.conn;
        let mut stmt =
            conn.prepare_cached("SELECT id, url FROM urls WHERE id > ?1 ORDER BY id LIMIT ?2")?;

        let rows = stmt.query_map(params![self.last_id, LISTING_PAGE_SIZE], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut fetched = 0;
        for row in rows {
            let (id, url) = row?;
            self.last_id = id;
            self.buffer.push_back(url);
            fetched += 1;
        }

        if fetched < LISTING_PAGE_SIZE {
            self.exhausted = true;
        }

        Ok(())
    }
}

impl Iterator for UrlListing<'_> {
    type Item = StorageResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }

        self.buffer.pop_front().map(Ok)
    }
}
