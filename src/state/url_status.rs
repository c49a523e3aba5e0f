/// URL status definitions for tracking crawl progress
///
/// This module defines the states a URL record moves through in the frontier.
use std::fmt;

/// Represents the current status of a URL record
///
/// Records start as `Todo` when discovered (or `Processing` for the seed), become
/// `Processing` when selected, and `Done` once fetched. A `Done` record becomes
/// `Processing` again when it is re-selected after the staleness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrlStatus {
    /// The URL was selected and its fetch/parse cycle has not completed
    Processing,

    /// The URL was discovered and is waiting to be selected
    Todo,

    /// The URL was fetched; it may be re-crawled once stale
    Done,
}

impl UrlStatus {
    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Todo => "todo",
            Self::Done => "done",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(Self::Processing),
            "todo" => Some(Self::Todo),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Returns all statuses in selection priority order
    pub fn all() -> [Self; 3] {
        [Self::Processing, Self::Todo, Self::Done]
    }

    /// Upper-case label used by the CLI record listing
    pub fn label(&self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Todo => "TODO",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
