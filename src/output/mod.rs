//! Output module for reporting on the frontier
//!
//! This module handles:
//! - Frontier statistics for `--stats`
//! - The record format used by `--get-url`

pub mod stats;

pub use stats::{format_statistics, load_statistics, print_statistics, CrawlStatistics};

use crate::storage::UrlRecord;

/// Column header printed above a record by `--get-url`
pub const RECORD_HEADER: &str =
    "<ID> <URL> <STATUS> <DIGEST> <CREATION TIMESTAMP> <UPDATED TIMESTAMP>";

/// Formats a record as `<ID> <URL> <STATUS> <DIGEST> <CREATED> <UPDATED>`
///
/// A missing digest is printed as `-`; timestamps are RFC 3339 in UTC.
pub fn format_record(record: &UrlRecord) -> String {
    format!(
        "{} {} {} {} {} {}",
        record.id,
        record.url,
        record.status.label(),
        record.digest.as_deref().unwrap_or("-"),
        record.created.to_rfc3339(),
        record.updated.to_rfc3339()
    )
}

/// Formats the `--get-url` answer for `url`: header plus record, or a not-found line
pub fn format_lookup(url: &str, record: Option<&UrlRecord>) -> String {
    match record {
        Some(record) => format!("{}\n{}", RECORD_HEADER, format_record(record)),
        None => format!("No database record was found for URL: {}", url),
    }
}
