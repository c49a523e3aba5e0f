use crate::url::filter::{active_filter, netloc_matches};
use crate::url::split::{split_url, UrlParts};
use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes the crawler is willing to follow
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Canonicalizes a raw link, dropping it when it cannot be followed
///
/// This is [`try_canonicalize`] with the reason discarded; see there for the rules.
///
/// # Examples
///
/// ```
/// use shoreline::url::canonicalize;
///
/// let page = Some("https://x.example/p");
/// assert_eq!(
///     canonicalize("/a/b", page, Some("example")),
///     Some("https://x.example/a/b".to_string())
/// );
/// assert_eq!(canonicalize("/a/b", Some("https://x.other/p"), Some("example")), None);
/// assert_eq!(canonicalize("mailto:x@y", page, None), None);
/// ```
pub fn canonicalize(
    raw: &str,
    current_page: Option<&str>,
    filter: Option<&str>,
) -> Option<String> {
    match try_canonicalize(raw, current_page, filter) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Dropping link {:?}: {}", raw, e);
            None
        }
    }
}

/// Reduces a raw link to `scheme://netloc[/path][;params][?query]`
///
/// # Rules
///
/// 1. A link with an `http`/`https` scheme and a network location keeps its own
///    authority. The *link's* network location must end with `filter`.
/// 2. A link without a scheme is relative to `current_page` and takes the page's
///    scheme and authority. The *page's* network location must end with `filter`,
///    since the link inherits it.
/// 3. Anything else (other schemes, a scheme without authority) is rejected.
/// 4. The path is copied verbatim behind a single leading `/` (an empty path
///    becomes `/`), followed by `;params` and `?query` when present. Fragments
///    are dropped.
///
/// The output is always absolute, so canonicalizing it again yields the same
/// string.
///
/// # Errors
///
/// Returns the `UrlError` describing why the link cannot be followed.
pub fn try_canonicalize(
    raw: &str,
    current_page: Option<&str>,
    filter: Option<&str>,
) -> UrlResult<String> {
    let raw = raw.trim();
    let parts = split_url(raw)?;

    let mut canonical = if !parts.scheme.is_empty() {
        if !ALLOWED_SCHEMES.contains(&parts.scheme.as_str()) {
            return Err(UrlError::DisallowedScheme(parts.scheme));
        }
        if parts.netloc.is_empty() {
            return Err(UrlError::MissingHost(raw.to_string()));
        }
        check_filter(raw, &parts, filter)?;
        base_of(&parts)?
    } else {
        let page = current_page.ok_or_else(|| UrlError::NoParent(raw.to_string()))?;
        let page_parts = split_url(page)?;
        if !page_parts.is_absolute() {
            return Err(UrlError::Malformed(format!(
                "parent page {} is not an absolute URL",
                page
            )));
        }
        check_filter(page, &page_parts, filter)?;
        base_of(&page_parts)?
    };

    if !parts.path.starts_with('/') {
        canonical.push('/');
    }
    canonical.push_str(parts.path);

    if !parts.params.is_empty() {
        canonical.push(';');
        canonical.push_str(parts.params);
    }
    if !parts.query.is_empty() {
        canonical.push('?');
        canonical.push_str(parts.query);
    }

    Ok(canonical)
}

fn check_filter(url: &str, parts: &UrlParts<'_>, filter: Option<&str>) -> UrlResult<()> {
    match active_filter(filter) {
        Some(filter) if !netloc_matches(parts.netloc, filter) => Err(UrlError::FilteredOut {
            url: url.to_string(),
            filter: filter.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Builds `scheme://netloc` and makes sure it is a URL a client could request
///
/// The whole network location has to end up in the parsed authority. HTTP
/// clients treat `\` as a path separator, so `evil.test\.example.org` would be
/// requested from `evil.test`; such a netloc is rejected rather than being
/// checked against the filter as written.
pub(crate) fn base_of(parts: &UrlParts<'_>) -> UrlResult<String> {
    let base = format!("{}://{}", parts.scheme, parts.netloc);

    if parts.netloc.contains('\\') {
        return Err(UrlError::Malformed(format!(
            "backslash in network location: {}",
            base
        )));
    }

    let parsed = Url::parse(&base).map_err(|e| UrlError::Malformed(format!("{}: {}", base, e)))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(base));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(UrlError::Malformed(format!(
            "network location spills into the path: {}",
            base
        )));
    }

    Ok(base)
}
