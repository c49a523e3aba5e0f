//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing and link extraction
//! - Priority selection of the next URL
//! - The crawl loop state machine

mod controller;
mod fetcher;
mod parser;
mod selector;

pub use controller::{Controller, ControllerSettings, ControllerState};
pub use fetcher::{build_http_client, format_user_agent, Fetcher, HttpFetcher};
pub use parser::{compute_digest, ExtractedPage, HtmlLinkExtractor, LinkExtractor};
pub use selector::PrioritySelector;

use crate::config::Config;
use crate::state::Clock;
use crate::storage::FrontierStore;
use std::sync::Arc;
use std::time::Duration;

/// Assembles a controller over `store` from the loaded configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration; its filter is used as-is
/// * `store` - The frontier store to crawl
/// * `fetcher` - Where page bodies come from, usually an [`HttpFetcher`]
/// * `clock` - The clock shared with `store`
pub fn build_controller<S: FrontierStore>(
    config: &Config,
    store: S,
    fetcher: Box<dyn Fetcher>,
    clock: Arc<dyn Clock>,
) -> Controller<S> {
    let settings = ControllerSettings {
        refresh_period: Duration::from_secs(config.crawler.refresh_period),
        filter_hostname: config.crawler.filter_hostname.clone(),
    };

    Controller::new(
        store,
        fetcher,
        Box::new(HtmlLinkExtractor::new()),
        PrioritySelector::new(clock, config.crawler.update_delta),
        settings,
    )
}
