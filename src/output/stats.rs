//! Statistics generation from the frontier database
//!
//! This module provides functionality for extracting and displaying
//! frontier statistics from the storage layer.

use crate::state::UrlStatus;
use crate::storage::FrontierStore;
use crate::ShorelineError;
use std::collections::HashMap;
use std::fmt::Write;

/// Frontier statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of URL records
    pub total_urls: u64,

    /// Count of URL records by status
    pub urls_by_status: HashMap<UrlStatus, u64>,

    /// Total number of recorded links
    pub total_links: u64,
}

impl CrawlStatistics {
    /// Count for one status, zero when absent
    pub fn count(&self, status: UrlStatus) -> u64 {
        self.urls_by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(ShorelineError)` - Failed to query statistics
pub fn load_statistics<S>(storage: &S) -> Result<CrawlStatistics, ShorelineError>
where
    S: FrontierStore + ?Sized,
{
    let total_urls = storage.count_urls()?;
    let total_links = storage.count_links()?;

    let mut urls_by_status = HashMap::new();
    for status in UrlStatus::all() {
        urls_by_status.insert(status, storage.count_urls_by_status(status)?);
    }

    Ok(CrawlStatistics {
        total_urls,
        urls_by_status,
        total_links,
    })
}

/// Renders statistics as the text shown by `--stats`
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Frontier Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Total URLs: {}", stats.total_urls);
    let _ = writeln!(out, "  Total links recorded: {}", stats.total_links);
    let _ = writeln!(out);

    let _ = writeln!(out, "URLs by Status:");
    for status in UrlStatus::all() {
        let count = stats.count(status);
        let percentage = if stats.total_urls > 0 {
            (count as f64 / stats.total_urls as f64) * 100.0
        } else {
            0.0
        };
        let _ = writeln!(out, "  {}: {} ({:.1}%)", status.label(), count, percentage);
    }

    out
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
