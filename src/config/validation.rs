use crate::config::types::{Config, CrawlerConfig, DomainEntry, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_social_domains(&config.social)?;
    Ok(())
}

/// Validates the seed URL given on the command line
///
/// The scheme must be spelled out: `example.com` is rejected rather than
/// guessing between HTTP and HTTPS.
pub fn validate_seed_url(seed: &str) -> Result<Url, ConfigError> {
    let seed = seed.trim();
    let lower = seed.to_ascii_lowercase();

    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            seed
        )));
    }

    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", seed, e)))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!("'{}' has no host", seed)));
    }

    Ok(url)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.max_levels == Some(0) {
        return Err(ConfigError::Validation(
            "max-levels must be >= 1 when set".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_duration == Some(0) {
        return Err(ConfigError::Validation(
            "max-duration must be >= 1s when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extra SOCIAL domain entries
fn validate_social_domains(domains: &[DomainEntry]) -> Result<(), ConfigError> {
    for entry in domains {
        validate_domain_pattern(&entry.domain)?;
    }
    Ok(())
}

/// Validates a SOCIAL domain pattern: `host.tld` or `*.host.tld`
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 {
        return Err(ConfigError::InvalidPattern(format!(
            "'{}' needs at least two labels (e.g., 'mastodon.social')",
            pattern
        )));
    }

    for label in labels {
        let well_formed = !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !well_formed {
            return Err(ConfigError::InvalidPattern(format!(
                "'{}' has a malformed label '{}'",
                pattern, label
            )));
        }
    }

    Ok(())
}
