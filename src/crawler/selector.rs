//! Priority selection of the next URL to crawl
//!
//! The frontier is read in three tiers, each one only consulted when the one
//! before it has no candidate:
//! 1. PROCESSING records, left over from an interrupted cycle
//! 2. TODO records, least recently updated first
//! 3. DONE records older than the update delta, least recently updated first
//!
//! Every candidate is re-checked against the hostname filter, since records
//! discovered under another filter may still be in the store.

use crate::state::{Clock, UrlStatus};
use crate::storage::{FrontierStore, StorageResult};
use crate::url::passes_hostname_filter;
use std::sync::Arc;

/// Picks the next URL out of a frontier store
#[derive(Clone)]
pub struct PrioritySelector {
    clock: Arc<dyn Clock>,
    update_delta: i64,
}

impl PrioritySelector {
    /// Creates a selector
    ///
    /// # Arguments
    ///
    /// * `clock` - Time source for the staleness check
    /// * `update_delta` - Seconds after which a DONE record may be crawled again
    pub fn new(clock: Arc<dyn Clock>, update_delta: u64) -> Self {
        Self {
            clock,
            update_delta: i64::try_from(update_delta).unwrap_or(i64::MAX),
        }
    }

    /// Returns the next URL to crawl, or `None` when nothing is selectable
    pub fn next_url<S>(&self, store: &S, filter: Option<&str>) -> StorageResult<Option<String>>
    where
        S: FrontierStore + ?Sized,
    {
        let mut admit = |url: &str| passes_hostname_filter(url, filter);

        for (status, updated_before) in self.tiers() {
            if let Some(url) = store.first_with_status(status, updated_before, &mut admit)? {
                tracing::trace!("Selected {} record {}", status, url);
                return Ok(Some(url));
            }
        }

        Ok(None)
    }

    /// Status and `updated` cutoff of each tier, in priority order
    ///
    /// A DONE record is stale when `now - updated > update_delta`, i.e. when
    /// `updated < now - update_delta`.
    fn tiers(&self) -> [(UrlStatus, Option<i64>); 3] {
        let stale_before = self.clock.now().saturating_sub(self.update_delta);
        [
            (UrlStatus::Processing, None),
            (UrlStatus::Todo, None),
            (UrlStatus::Done, Some(stale_before)),
        ]
    }
}

impl std::fmt::Debug for PrioritySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrioritySelector")
            .field("update_delta", &self.update_delta)
            .finish_non_exhaustive()
    }
}
