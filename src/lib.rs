//! Shoreline: a resumable single-stream web crawler
//!
//! This crate implements the crawl frontier and its state machine: it decides which
//! URL to fetch next, tracks every URL through its lifecycle, canonicalizes
//! discovered links and keeps all of it durable in SQLite across restarts.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Shoreline operations
#[derive(Debug, Error)]
pub enum ShorelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Seed URL {url} is invalid: {source}")]
    InvalidSeed { url: String, source: UrlError },

    #[error("No URLs found in the database and no seed URL given - nothing to do")]
    EmptyFrontier,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons a raw link cannot be turned into a canonical URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Malformed URL: {0}")]
    Malformed(String),

    #[error("URL scheme not allowed: {0}")]
    DisallowedScheme(String),

    #[error("Missing network location in URL: {0}")]
    MissingHost(String),

    #[error("URL {url} not allowed by hostname filter '{filter}'")]
    FilteredOut { url: String, filter: String },

    #[error("Relative URL {0} has no parent page to resolve against")]
    NoParent(String),
}

/// Transport failures while fetching a page
///
/// Any of these means "no links extracted" to the crawl loop; none is fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Connection error for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{Clock, ManualClock, SystemClock, UrlStatus};
pub use crate::url::{canonicalize, passes_hostname_filter, try_canonicalize};
