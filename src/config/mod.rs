//! Configuration module for Shoreline
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to its defaults.
//!
//! # Example
//!
//! ```no_run
//! use shoreline::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shoreline.toml")).unwrap();
//! println!("Idle wait: {}s", config.crawler.refresh_period);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_filter_hostname};
