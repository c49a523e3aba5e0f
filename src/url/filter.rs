use crate::url::canonical::base_of;
use crate::url::split::split_url;

/// Checks a URL's network location against a hostname filter
///
/// The filter is a plain suffix: `example.org` admits `example.org`,
/// `www.example.org` and also `notexample.org`. A missing or empty filter admits
/// everything. URLs that cannot be split, or whose network location is not
/// the authority a client would actually contact, are rejected.
///
/// # Examples
///
/// ```
/// use shoreline::url::passes_hostname_filter;
///
/// assert!(passes_hostname_filter("https://blog.example.org/", Some("example.org")));
/// assert!(!passes_hostname_filter("https://example.com/", Some("example.org")));
/// assert!(passes_hostname_filter("https://example.com/", None));
/// ```
pub fn passes_hostname_filter(url: &str, filter: Option<&str>) -> bool {
    let Some(filter) = active_filter(filter) else {
        return true;
    };

    match split_url(url) {
        Ok(parts) => netloc_matches(parts.netloc, filter) && base_of(&parts).is_ok(),
        Err(_) => false,
    }
}

/// Returns the filter if it actually restricts anything
pub(crate) fn active_filter(filter: Option<&str>) -> Option<&str> {
    filter.filter(|f| !f.is_empty())
}

/// Suffix comparison on the raw network location (port and userinfo included)
pub(crate) fn netloc_matches(netloc: &str, filter: &str) -> bool {
    netloc.ends_with(filter)
}
