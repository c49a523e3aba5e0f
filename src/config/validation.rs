use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.update_delta < 1 {
        return Err(ConfigError::Validation(format!(
            "update_delta must be >= 1s, got {}s",
            config.update_delta
        )));
    }

    if config.refresh_period < 1 {
        return Err(ConfigError::Validation(format!(
            "refresh_period must be >= 1s, got {}s",
            config.refresh_period
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if let Some(filter) = &config.filter_hostname {
        validate_filter_hostname(filter)?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a hostname filter
///
/// The filter is a plain suffix of the network location, so a port is allowed.
pub fn validate_filter_hostname(filter: &str) -> Result<(), ConfigError> {
    if filter.is_empty() {
        return Err(ConfigError::Validation(
            "filter_hostname cannot be empty".to_string(),
        ));
    }

    if !filter
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':')
    {
        return Err(ConfigError::Validation(format!(
            "filter_hostname '{}' contains invalid characters",
            filter
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_durations() {
        let mut config = Config::default();
        config.crawler.refresh_period = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.crawler.request_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "My Crawler".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "my-crawler2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = Some("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.user_agent.contact_url = Some("https://example.org/bot".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_filter_hostname() {
        assert!(validate_filter_hostname("example.org").is_ok());
        assert!(validate_filter_hostname("example").is_ok());
        assert!(validate_filter_hostname("localhost:8080").is_ok());

        assert!(validate_filter_hostname("").is_err());
        assert!(validate_filter_hostname("exa mple.org").is_err());
        assert!(validate_filter_hostname("example.org/path").is_err());
    }

    #[test]
    fn test_set_filter_hostname_drops_empty() {
        let mut config = Config::default();
        config.crawler.set_filter_hostname(Some(String::new()));
        assert_eq!(config.crawler.filter_hostname, None);
        assert!(validate(&config).is_ok());

        config.crawler.set_filter_hostname(Some("example.org".to_string()));
        assert_eq!(config.crawler.filter_hostname.as_deref(), Some("example.org"));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.output.database_path = String::new();
        assert!(validate(&config).is_err());
    }
}
