//! URL handling module for Shoreline
//!
//! This module turns the raw `href` values found on a page into canonical URLs,
//! the comparable absolute form used as the unique key of every frontier record.
//!
//! - `split`: the six-part `scheme://netloc/path;params?query#fragment` split
//! - `canonical`: canonicalization against the current page
//! - `filter`: the hostname suffix filter

mod canonical;
mod filter;
mod split;

// Re-export main functions
pub use canonical::{canonicalize, try_canonicalize, ALLOWED_SCHEMES};
pub use filter::passes_hostname_filter;
pub use split::{split_url, UrlParts};
