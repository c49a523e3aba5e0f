//! Crawl loop controller - the frontier state machine
//!
//! The controller is either `Idle` (nothing selectable, waiting for the refresh
//! period) or `Active(url)` (the URL is marked PROCESSING and will be fetched
//! next). One `step` performs one transition:
//!
//! - `Active(url)`: fetch, extract links and digest, record every distinct
//!   canonical link as TODO with an edge from `url`, mark `url` DONE, then
//!   select the next URL.
//! - `Idle`: select the next URL.
//!
//! `run` repeats steps until cancelled, sleeping whenever the controller is idle.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{ExtractedPage, LinkExtractor};
use crate::crawler::selector::PrioritySelector;
use crate::state::UrlStatus;
use crate::storage::FrontierStore;
use crate::url::{canonicalize, try_canonicalize};
use crate::ShorelineError;
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Where the crawl loop currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing is selectable
    Idle,
    /// This URL is PROCESSING and is fetched on the next step
    Active(String),
}

/// Tunables for the crawl loop
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// How long to wait while idle before selecting again
    pub refresh_period: Duration,

    /// Hostname suffix every crawled and recorded URL must match
    pub filter_hostname: Option<String>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            refresh_period: Duration::from_secs(300),
            filter_hostname: None,
        }
    }
}

/// Drives the crawl over a frontier store
pub struct Controller<S: FrontierStore> {
    store: S,
    fetcher: Box<dyn Fetcher>,
    extractor: Box<dyn LinkExtractor>,
    selector: PrioritySelector,
    settings: ControllerSettings,
    state: ControllerState,
}

impl<S: FrontierStore> Controller<S> {
    /// Creates an idle controller; call [`Controller::start`] before stepping
    pub fn new(
        store: S,
        fetcher: Box<dyn Fetcher>,
        extractor: Box<dyn LinkExtractor>,
        selector: PrioritySelector,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractor,
            selector,
            settings,
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gives the store back, e.g. to close it
    pub fn into_store(self) -> S {
        self.store
    }

    fn filter(&self) -> Option<&str> {
        self.settings.filter_hostname.as_deref()
    }

    /// Enters the crawl, from `seed` if given or from the stored frontier
    ///
    /// # Errors
    ///
    /// * `ShorelineError::InvalidSeed` - the seed cannot be canonicalized
    /// * `ShorelineError::EmptyFrontier` - no seed and an empty store
    /// * `ShorelineError::Storage` - the store failed
    pub fn start(&mut self, seed: Option<&str>) -> Result<(), ShorelineError> {
        match seed {
            Some(seed) => {
                let url = try_canonicalize(seed, None, self.filter()).map_err(|source| {
                    ShorelineError::InvalidSeed {
                        url: seed.to_string(),
                        source,
                    }
                })?;

                self.mark_processing(&url)?;
                tracing::info!("Starting from seed {}", url);
                self.state = ControllerState::Active(url);
            }
            None => match self.selector.next_url(&self.store, self.filter())? {
                Some(url) => {
                    self.mark_processing(&url)?;
                    tracing::info!("Resuming with {}", url);
                    self.state = ControllerState::Active(url);
                }
                None if self.store.count_urls()? == 0 => {
                    return Err(ShorelineError::EmptyFrontier);
                }
                None => {
                    tracing::info!("Nothing to crawl right now");
                    self.state = ControllerState::Idle;
                }
            },
        }

        Ok(())
    }

    /// Runs until `cancel` fires
    pub async fn run(&mut self, cancel: &CancellationToken) {
        while !cancel.is_cancelled() {
            if self.state == ControllerState::Idle {
                tracing::info!(
                    "Waiting {}s for URLs to become available",
                    self.settings.refresh_period.as_secs()
                );

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.settings.refresh_period) => {}
                }
            }

            self.step(cancel).await;
        }

        tracing::info!("Crawl loop stopped");
    }

    /// Performs exactly one transition without sleeping
    pub async fn step(&mut self, cancel: &CancellationToken) -> &ControllerState {
        match self.state.clone() {
            ControllerState::Idle => self.advance(),
            ControllerState::Active(url) => {
                if !self.crawl(&url, cancel).await {
                    return &self.state;
                }
                self.advance();
            }
        }

        &self.state
    }

    /// Processes one URL; returns false if cancelled before anything was written
    async fn crawl(&mut self, url: &str, cancel: &CancellationToken) -> bool {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.fetcher.fetch(url) => Some(result),
        };

        let Some(fetched) = fetched else {
            tracing::info!("URL {} - interrupted, left for the next run", url);
            return false;
        };

        let page = match fetched {
            Ok(body) => self.extractor.extract(&body),
            Err(e) => {
                tracing::debug!("URL {} - fetch failed: {}", url, e);
                ExtractedPage::default()
            }
        };

        self.record_links(url, &page.links);

        match self
            .store
            .finalize_url(url, page.digest.as_deref(), UrlStatus::Done)
        {
            Ok(true) => tracing::info!("URL {} - done", url),
            Ok(false) => tracing::warn!("URL {} - no record to mark done", url),
            Err(e) => tracing::error!("URL {} - could not be marked done: {}", url, e),
        }

        true
    }

    /// Stores every distinct canonical link as TODO with an edge from `url`
    fn record_links(&mut self, url: &str, raw_links: &[String]) {
        let mut seen_raw = HashSet::new();
        let mut seen_canonical = HashSet::new();
        let mut links = Vec::new();

        for raw in raw_links {
            if !seen_raw.insert(raw.as_str()) {
                continue;
            }
            if let Some(link) = canonicalize(raw, Some(url), self.filter()) {
                if seen_canonical.insert(link.clone()) {
                    links.push(link);
                }
            }
        }

        tracing::debug!(
            "URL {} - {} raw links, {} to record",
            url,
            raw_links.len(),
            links.len()
        );

        for link in &links {
            match self.store.upsert_url(link, UrlStatus::Todo) {
                Ok(outcome) if outcome.is_applied() => {}
                Ok(_) => tracing::warn!("URL {} - could not be queued", link),
                Err(e) => tracing::warn!("URL {} - could not be queued: {}", link, e),
            }

            if let Err(e) = self.store.add_link(url, link) {
                tracing::warn!("Link {} -> {} - could not be recorded: {}", url, link, e);
            }
        }
    }

    /// Selects the next URL and moves to `Active` or `Idle`
    fn advance(&mut self) {
        let next = match self.selector.next_url(&self.store, self.filter()) {
            Ok(next) => next,
            Err(e) => {
                tracing::error!("Selecting the next URL failed: {}", e);
                None
            }
        };

        self.state = match next {
            Some(url) => match self.mark_processing(&url) {
                Ok(()) => {
                    tracing::info!("URL {} - processing", url);
                    ControllerState::Active(url)
                }
                Err(e) => {
                    tracing::error!("URL {} - could not be marked processing: {}", url, e);
                    ControllerState::Idle
                }
            },
            None => ControllerState::Idle,
        };
    }

    fn mark_processing(&mut self, url: &str) -> Result<(), ShorelineError> {
        let outcome = self.store.upsert_url(url, UrlStatus::Processing)?;
        if !outcome.is_applied() {
            tracing::warn!("URL {} - status change to PROCESSING abandoned", url);
        }
        Ok(())
    }
}
