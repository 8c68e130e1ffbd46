use url::Url;

/// Extracts the host from a URL, lowercased
///
/// URLs without a host (`mailto:`, `tel:`, ...) yield `None`. The port is
/// never part of the result, so two servers on the same host but different
/// ports share a hostname.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use moss::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:team@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Returns true if `host` is the run hostname, optionally `www.`-prefixed
pub fn is_same_site(host: &str, hostname: &str) -> bool {
    host == hostname || host.strip_prefix("www.") == Some(hostname)
}
