//! Storage traits and error types
//!
//! This module defines the trait interface for the frontier store and the
//! associated error types.

use crate::state::UrlStatus;
use crate::storage::{LinkOutcome, LinkRecord, UpsertOutcome, UrlRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Lazy sequence of stored URLs
pub type UrlIter<'a> = Box<dyn Iterator<Item = StorageResult<String>> + 'a>;

/// Trait for frontier store implementations
///
/// Every mutating operation is atomic: it is either fully applied or not at all.
/// Integrity conflicts that cannot be resolved are reported through the outcome
/// enums rather than as errors; `Err` is reserved for the database itself failing.
pub trait FrontierStore {
    // ===== URL Records =====

    /// Inserts a URL record, or updates the status of the existing one
    ///
    /// A new record gets `created = updated = now`. An existing record only has
    /// its `status` and `updated` changed; `created` and `digest` are kept.
    fn upsert_url(&mut self, url: &str, status: UrlStatus) -> StorageResult<UpsertOutcome>;

    /// Sets the status of an existing record, and its digest when one is given
    ///
    /// An empty digest counts as no digest. Returns false if no record matched.
    fn finalize_url(
        &mut self,
        url: &str,
        digest: Option<&str>,
        status: UrlStatus,
    ) -> StorageResult<bool>;

    /// Gets a record by its canonical URL
    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>>;

    /// Lists every stored URL
    ///
    /// Each call runs a fresh query; rows are fetched in pages as the iterator
    /// is consumed.
    fn list_all_urls(&self) -> UrlIter<'_>;

    /// Returns the first URL with `status`, oldest `updated` first, that `accept` admits
    ///
    /// With `updated_before`, only records whose `updated` is strictly smaller are
    /// considered. Rows are read lazily and scanning stops at the first match.
    fn first_with_status(
        &self,
        status: UrlStatus,
        updated_before: Option<i64>,
        accept: &mut dyn FnMut(&str) -> bool,
    ) -> StorageResult<Option<String>>;

    // ===== Link Management =====

    /// Records a link from the page at `parent_url` to `link`
    ///
    /// The parent lookup and the insert share one transaction. A missing parent
    /// is logged and reported as `LinkOutcome::ParentMissing`.
    fn add_link(&mut self, parent_url: &str, link: &str) -> StorageResult<LinkOutcome>;

    /// Gets the links recorded for a page, in insertion order
    fn outgoing_links(&self, parent_url: &str) -> StorageResult<Vec<LinkRecord>>;

    // ===== Statistics =====

    /// Gets total URL record count
    fn count_urls(&self) -> StorageResult<u64>;

    /// Counts URL records by status
    fn count_urls_by_status(&self, status: UrlStatus) -> StorageResult<u64>;

    /// Counts the total number of links
    fn count_links(&self) -> StorageResult<u64>;
}
