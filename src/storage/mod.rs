//! Storage module for persisting the crawl frontier
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema management
//! - URL records and their lifecycle status
//! - Link (edge) tracking between pages

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{FrontierStore, StorageError, StorageResult, UrlIter};

use crate::state::{Clock, UrlStatus};
use crate::ShorelineError;

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

/// Initializes or opens a frontier database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `clock` - Time source for record timestamps
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ShorelineError)` - Failed to initialize storage
pub fn open_storage(path: &Path, clock: Arc<dyn Clock>) -> Result<SqliteStorage, ShorelineError> {
    Ok(SqliteStorage::open(path, clock)?)
}

/// Represents a URL record in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub status: UrlStatus,
    pub digest: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Represents a link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub parent_id: i64,
    pub link: String,
}

/// What `upsert_url` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was created
    Inserted,
    /// The existing record's status was updated
    Updated,
    /// Neither insert nor update could be applied; nothing changed
    Abandoned,
}

impl UpsertOutcome {
    /// Returns true if the record now carries the requested status
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Abandoned)
    }
}

/// What `add_link` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new edge was recorded
    Added,
    /// The edge already existed
    AlreadyPresent,
    /// The parent URL has no record, so the edge was dropped
    ParentMissing,
    /// The insert hit an integrity conflict; nothing changed
    Abandoned,
}
