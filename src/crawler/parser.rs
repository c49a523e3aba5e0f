//! HTML parser for extracting links and the page digest
//!
//! Links are returned raw, exactly as written in the `href` attribute, so the
//! crawl loop can canonicalize them against the page they were found on.

use scraper::{Html, Selector};
use sha2::{Digest, Sha512};

/// Extracted information from a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Raw `href` values in document order, duplicates included
    pub links: Vec<String>,

    /// Hex SHA-512 of the body
    pub digest: Option<String>,
}

/// Turns a page body into raw links and a content digest
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, body: &str) -> ExtractedPage;
}

/// `scraper`-backed extractor reading `<a href>` and `<link href>`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &str) -> ExtractedPage {
        let document = Html::parse_document(body);
        let mut links = Vec::new();

        // One combined selector keeps <a> and <link> in document order
        if let Ok(selector) = Selector::parse("a[href], link[href]") {
            for element in document.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    links.push(href.to_string());
                }
            }
        }

        ExtractedPage {
            links,
            digest: Some(compute_digest(body)),
        }
    }
}

/// Hex-encoded SHA-512 of the page body
pub fn compute_digest(body: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}
