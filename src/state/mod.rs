//! State module for tracking crawl progress
//!
//! This module provides the lifecycle state of URL records and the time source
//! shared by the frontier store and the selector.
//!
//! # Components
//!
//! - `UrlStatus`: Where a URL record is in its lifecycle (processing, todo, done)
//! - `Clock`: The injected "now" used for `created`/`updated` timestamps and staleness

mod clock;
mod url_status;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use url_status::UrlStatus;
