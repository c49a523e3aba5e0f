use crate::{UrlError, UrlResult};

/// The six components of a URL as produced by the classic
/// `scheme://netloc/path;params?query#fragment` split
///
/// Unlike a WHATWG parse, the split keeps every component verbatim (apart from
/// lowercasing the scheme) and accepts relative references, which is what the
/// canonicalizer needs to rebuild links without rewriting their paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Lowercased scheme, empty for relative references
    pub scheme: String,
    /// Authority between `//` and the path, empty when absent
    pub netloc: &'a str,
    pub path: &'a str,
    /// Parameters after `;` in the last path segment
    pub params: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

impl UrlParts<'_> {
    /// Returns true if the URL carries both a scheme and a network location
    pub fn is_absolute(&self) -> bool {
        !self.scheme.is_empty() && !self.netloc.is_empty()
    }
}

/// Splits a URL or relative reference into its six components
///
/// # Errors
///
/// Returns `UrlError::Malformed` when the network location has unbalanced IPv6
/// brackets or the input contains control characters.
///
/// # Examples
///
/// ```
/// use shoreline::url::split_url;
///
/// let parts = split_url("HTTPS://example.com/a/b;p?q=1#top").unwrap();
/// assert_eq!(parts.scheme, "https");
/// assert_eq!(parts.netloc, "example.com");
/// assert_eq!(parts.path, "/a/b");
/// assert_eq!(parts.params, "p");
/// assert_eq!(parts.query, "q=1");
/// assert_eq!(parts.fragment, "top");
/// ```
pub fn split_url(input: &str) -> UrlResult<UrlParts<'_>> {
    if input.chars().any(|c| c.is_control()) {
        return Err(UrlError::Malformed(input.escape_debug().to_string()));
    }

    let (scheme, mut rest) = split_scheme(input);

    let mut netloc = "";
    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        netloc = &after[..end];
        rest = &after[end..];

        if netloc.contains('[') != netloc.contains(']') {
            return Err(UrlError::Malformed(format!(
                "unbalanced brackets in network location: {}",
                input
            )));
        }
    }

    let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
    let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));
    let (path, params) = split_params(rest);

    Ok(UrlParts {
        scheme,
        netloc,
        path,
        params,
        query,
        fragment,
    })
}

/// Separates a leading `scheme:` from the rest of the input
///
/// A candidate scheme must start with a letter and contain only letters, digits,
/// `+`, `-` and `.`. Something like `localhost:8080` is not a scheme: when
/// everything after the colon is digits the colon is treated as part of the path.
fn split_scheme(input: &str) -> (String, &str) {
    let Some(colon) = input.find(':') else {
        return (String::new(), input);
    };

    let candidate = &input[..colon];
    let rest = &input[colon + 1..];

    let valid = candidate
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    let port_like = !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit());

    if valid && !port_like {
        (candidate.to_ascii_lowercase(), rest)
    } else {
        (String::new(), input)
    }
}

/// Splits `;params` off a path
///
/// Parameters are only recognized when the last path segment contains a `;`;
/// they then start at the first `;` of the whole path.
fn split_params(path: &str) -> (&str, &str) {
    let last_segment = path.rfind('/').unwrap_or(0);
    if !path[last_segment..].contains(';') {
        return (path, "");
    }

    match path.split_once(';') {
        Some((path, params)) => (path, params),
        None => (path, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_absolute() {
        let parts = split_url("https://a.test/page1").unwrap();
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.netloc, "a.test");
        assert_eq!(parts.path, "/page1");
        assert!(parts.is_absolute());
    }

    #[test]
    fn test_split_relative_path() {
        let parts = split_url("/page2?x=1").unwrap();
        assert_eq!(parts.scheme, "");
        assert_eq!(parts.netloc, "");
        assert_eq!(parts.path, "/page2");
        assert_eq!(parts.query, "x=1");
        assert!(!parts.is_absolute());
    }

    #[test]
    fn test_split_mailto_has_no_netloc() {
        let parts = split_url("mailto:x@y").unwrap();
        assert_eq!(parts.scheme, "mailto");
        assert_eq!(parts.netloc, "");
        assert_eq!(parts.path, "x@y");
    }

    #[test]
    fn test_split_protocol_relative() {
        let parts = split_url("//cdn.test/lib.js").unwrap();
        assert_eq!(parts.scheme, "");
        assert_eq!(parts.netloc, "cdn.test");
        assert_eq!(parts.path, "/lib.js");
    }

    #[test]
    fn test_split_port_is_not_a_scheme() {
        let parts = split_url("localhost:8080").unwrap();
        assert_eq!(parts.scheme, "");
        assert_eq!(parts.path, "localhost:8080");
    }

    #[test]
    fn test_split_params_only_from_last_segment() {
        let parts = split_url("http://h/a;x/b").unwrap();
        assert_eq!(parts.path, "/a;x/b");
        assert_eq!(parts.params, "");

        let parts = split_url("http://h/a/b;x").unwrap();
        assert_eq!(parts.path, "/a/b");
        assert_eq!(parts.params, "x");
    }

    #[test]
    fn test_split_fragment_before_query() {
        let parts = split_url("http://h/p#frag?not-query").unwrap();
        assert_eq!(parts.path, "/p");
        assert_eq!(parts.query, "");
        assert_eq!(parts.fragment, "frag?not-query");
    }

    #[test]
    fn test_split_unbalanced_brackets() {
        assert!(split_url("http://[::1/path").is_err());
    }

    #[test]
    fn test_split_control_characters() {
        assert!(split_url("http://h/\n").is_err());
    }
}
