use crate::UrlError;
use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a link href to an absolute http(s) URL
///
/// # Exclusions
///
/// - Empty hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links (same-page anchors)
/// - Anything that is not http or https after resolution
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `base_url` - The URL of the page the link appeared on
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError)` - The link is excluded or malformed
///
/// # Examples
///
/// ```
/// use docsift::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://developers.google.com/apps-script/overview").unwrap();
/// let url = resolve_href("reference/calendar", &base).unwrap();
/// assert_eq!(url.as_str(), "https://developers.google.com/apps-script/reference/calendar");
/// assert!(resolve_href("mailto:someone@example.com", &base).is_err());
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    let lowered = href.to_ascii_lowercase();
    if let Some(scheme) = SKIPPED_SCHEMES.iter().find(|s| lowered.starts_with(*s)) {
        return Err(UrlError::UnsupportedScheme(scheme.trim_end_matches(':').to_string()));
    }

    if href.starts_with('#') {
        return Err(UrlError::FragmentOnly(href.to_string()));
    }

    let absolute = base_url
        .join(href)
        .map_err(|e| UrlError::Malformed(format!("{}: {}", href, e)))?;

    match absolute.scheme() {
        "http" | "https" => Ok(absolute),
        other => Err(UrlError::UnsupportedScheme(other.to_string())),
    }
}
