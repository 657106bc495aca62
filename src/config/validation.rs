use crate::config::types::{
    Config, CrawlerConfig, HeuristicsConfig, OutputConfig, SeedEntry, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// The seed list is checked first: a run without seeds is rejected before
/// anything else is looked at.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    seed_urls(&config.seeds)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_heuristics(&config.heuristics)?;
    Ok(())
}

/// Parses the seed list into absolute http(s) URLs
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - One URL per seed entry, in configuration order
/// * `Err(ConfigError::MissingSeeds)` - The list is empty
/// * `Err(ConfigError::InvalidUrl)` - A seed does not parse or is not http(s)
pub fn seed_urls(seeds: &[SeedEntry]) -> Result<Vec<Url>, ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::MissingSeeds);
    }

    seeds
        .iter()
        .map(|seed| {
            let url = Url::parse(seed.url.trim()).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed.url, e))
            })?;

            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::InvalidUrl(format!(
                    "Seed URL '{}' must use http or https",
                    seed.url
                )));
            }

            Ok(url)
        })
        .collect()
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_total < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_total must be >= 1, got {}",
            config.max_pages_total
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
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

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates keyword and ignored-domain lists
///
/// An empty entry is a substring of every link, so it would either match or
/// ignore everything on a page.
fn validate_heuristics(config: &HeuristicsConfig) -> Result<(), ConfigError> {
    if config.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords cannot contain empty entries".to_string(),
        ));
    }

    if config.ignored_domains.iter().any(|d| d.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "ignored_domains cannot contain empty entries".to_string(),
        ));
    }

    if config.keywords.is_empty() {
        tracing::warn!("No keywords configured; no partner page will ever be found");
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
