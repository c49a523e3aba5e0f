use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use shoreline::config::load_config;
///
/// let config = load_config(Path::new("shoreline.toml")).unwrap();
/// println!("Update delta: {}s", config.crawler.update_delta);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;
    let filter = config.crawler.filter_hostname.take();
    config.crawler.set_filter_hostname(filter);
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
update-delta = 3600
refresh-period = 60
request-timeout = 10
filter-hostname = "example.org"

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.org/bot"

[output]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.update_delta, 3600);
        assert_eq!(config.crawler.refresh_period, 60);
        assert_eq!(config.crawler.request_timeout, 10);
        assert_eq!(config.crawler.filter_hostname.as_deref(), Some("example.org"));
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.output.database_path, "./test.db");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.update_delta, 86_400);
        assert_eq!(config.crawler.refresh_period, 300);
        assert_eq!(config.crawler.filter_hostname, None);
        assert_eq!(config.user_agent.crawler_name, "Shoreline");
        assert_eq!(config.user_agent.contact_url, None);
        assert_eq!(config.output.database_path, "database.db");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[crawler]\nrefresh-period = 5\n").unwrap();
        assert_eq!(config.crawler.refresh_period, 5);
        assert_eq!(config.crawler.update_delta, 86_400);
        assert_eq!(config.crawler.request_timeout, 30);
    }

    #[test]
    fn test_empty_filter_hostname_means_no_filter() {
        let config = parse_config("[crawler]\nfilter-hostname = \"\"\n").unwrap();
        assert_eq!(config.crawler.filter_hostname, None);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/shoreline.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
update-delta = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
