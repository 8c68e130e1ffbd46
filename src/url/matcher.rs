/// Checks if a host matches a domain pattern from the SOCIAL allowlist
///
/// Two kinds of patterns are supported:
/// 1. Exact match: "x.com" matches only "x.com"
/// 2. Wildcard match: "*.facebook.com" matches:
///    - "facebook.com" (the bare domain)
///    - "m.facebook.com" (single subdomain)
///    - "business.m.facebook.com" (nested subdomains)
///
/// Both sides are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use moss::url::matches_wildcard;
///
/// assert!(matches_wildcard("x.com", "x.com"));
/// assert!(!matches_wildcard("x.com", "dropbox.com"));
///
/// assert!(matches_wildcard("*.youtube.com", "youtube.com"));
/// assert!(matches_wildcard("*.youtube.com", "m.youtube.com"));
/// assert!(!matches_wildcard("*.youtube.com", "notyoutube.com"));
/// ```
pub fn matches_wildcard(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => host == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_wildcard("x.com", "x.com"));
        assert!(matches_wildcard("telegram.me", "telegram.me"));
    }

    #[test]
    fn test_exact_does_not_match_lookalikes() {
        // Exact patterns match whole hosts only, never a suffix
        assert!(!matches_wildcard("x.com", "dropbox.com"));
        assert!(!matches_wildcard("x.com", "www.x.com"));
    }

    #[test]
    fn test_wildcard_matches_bare_and_subdomains() {
        assert!(matches_wildcard("*.facebook.com", "facebook.com"));
        assert!(matches_wildcard("*.facebook.com", "www.facebook.com"));
        assert!(matches_wildcard("*.facebook.com", "business.m.facebook.com"));
    }

    #[test]
    fn test_wildcard_no_partial_label_match() {
        assert!(!matches_wildcard("*.linkedin.com", "fakelinkedin.com"));
        assert!(!matches_wildcard("*.linkedin.com", "linkedin.com.evil.net"));
    }

    #[test]
    fn test_empty_strings() {
        assert!(!matches_wildcard("*.x.com", ""));
        assert!(!matches_wildcard("", "x.com"));
    }
}
