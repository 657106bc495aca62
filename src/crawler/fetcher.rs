//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Returns true if another attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            Self::Network { .. } => true,
            Self::NotHtml { .. } | Self::RetriesExhausted { .. } => false,
        }
    }
}

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Retry behavior for [`fetch_page`]
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before retry `n` is `base_delay * n`
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Formats the user agent string: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use partner_scout::config::UserAgentConfig;
/// use partner_scout::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "PartnerScout".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, 30).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches an HTML page, retrying transient failures
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx, HTML | Success |
/// | HTTP 2xx, not HTML | Immediate → NotHtml |
/// | HTTP 408 / 429 / 5xx | Retry up to `max_retries` times |
/// | Other HTTP 4xx | Immediate → Status |
/// | Timeout / connection error | Retry up to `max_retries` times |
///
/// Retry `n` waits `base_delay * n` before going out.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    policy: RetryPolicy,
) -> Result<FetchedPage, FetchError> {
    let mut attempt = 0;

    loop {
        match fetch_once(client, url).await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.base_delay * attempt;
                tracing::debug!(
                    "Attempt {} for {} failed ({}), retrying in {:?}",
                    attempt,
                    url,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) if e.is_transient() && attempt > 0 => {
                return Err(FetchError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt + 1,
                    last: Box::new(e),
                });
            }
            Err(e) => return Err(e),
        }
    }
}

/// Performs one GET request and classifies the response
async fn fetch_once(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client.get(url).send().await.map_err(|e| {
        let message = if e.is_timeout() {
            "Request timeout".to_string()
        } else if e.is_connect() {
            "Connection refused".to_string()
        } else {
            e.to_string()
        };
        FetchError::Network {
            url: url.to_string(),
            message,
        }
    })?;

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // A missing Content-Type is treated as HTML
    if !content_type.is_empty() && !is_html(&content_type) {
        return Err(FetchError::NotHtml {
            url: url.to_string(),
            content_type,
        });
    }

    let body = response.text().await.map_err(|e| FetchError::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

fn is_html(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("text/html") || lower.contains("application/xhtml+xml")
}

/// Status codes that are worth retrying
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}
