use crate::UrlError;
use url::Url;

/// Anchor target browsers treat as "do nothing"
const NOOP_HREF: &str = "javascript:void(0)";

/// Normalizes an absolute URL string into its canonical form
///
/// # Canonical Form
///
/// 1. Parse the URL; reject if malformed
/// 2. Drop the query string
/// 3. Drop the fragment
/// 4. Remove trailing slashes from the path (the root path stays `/`)
///
/// Only scheme, host (and port) and path survive, so two spellings of the same
/// resource modulo query, fragment and trailing slash compare equal.
/// Normalizing an already canonical URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use moss::url::normalize_url;
///
/// let url = normalize_url("https://example.com/docs/?page=2#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(canonicalize(url))
}

/// Resolves a raw `href` found on a page into a canonical absolute URL
///
/// Returns `None` for hrefs that never address a new resource:
/// - empty hrefs
/// - same-page anchors (`#...`)
/// - the bare root `/`
/// - the `javascript:void(0)` no-op marker
/// - hrefs that cannot be resolved against `base`
///
/// Relative, absolute-path and protocol-relative hrefs are resolved against
/// `base` with standard URL resolution; hrefs that carry their own scheme
/// (`https:`, `mailto:`, `tel:`, ...) are taken as-is.
///
/// # Examples
///
/// ```
/// use moss::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/post").unwrap();
/// let link = resolve_link("../about/", &base).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/about");
///
/// assert!(resolve_link("#top", &base).is_none());
/// ```
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if is_ignored_href(href) {
        return None;
    }

    match base.join(href) {
        Ok(resolved) => Some(canonicalize(resolved)),
        Err(e) => {
            tracing::trace!("Unresolvable href {:?} on {}: {}", href, base, e);
            None
        }
    }
}

fn is_ignored_href(href: &str) -> bool {
    href.is_empty() || href.starts_with('#') || href == "/" || href.eq_ignore_ascii_case(NOOP_HREF)
}

/// Strips everything except scheme, authority and path
fn canonicalize(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);

    // Opaque URLs (mailto:, tel:) have no hierarchical path to trim
    if !url.cannot_be_a_base() {
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    url
}
