use serde::Deserialize;

/// Main configuration structure for Shoreline
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seconds before a DONE record becomes eligible for re-crawl
    #[serde(rename = "update-delta", default = "default_update_delta")]
    pub update_delta: u64,

    /// Seconds to wait when nothing is selectable
    #[serde(rename = "refresh-period", default = "default_refresh_period")]
    pub refresh_period: u64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Hostname suffix restricting the crawl
    #[serde(rename = "filter-hostname", default)]
    pub filter_hostname: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            update_delta: default_update_delta(),
            refresh_period: default_refresh_period(),
            request_timeout: default_request_timeout(),
            filter_hostname: None,
        }
    }
}

impl CrawlerConfig {
    /// Sets the hostname filter; an empty suffix means no filter
    pub fn set_filter_hostname(&mut self, filter: Option<String>) {
        self.filter_hostname = filter.filter(|f| !f.is_empty());
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_update_delta() -> u64 {
    86_400
}

fn default_refresh_period() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    30
}

fn default_crawler_name() -> String {
    "Shoreline".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_database_path() -> String {
    "database.db".to_string()
}
