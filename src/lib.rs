//! Partner-Scout: an affiliate program finder
//!
//! This crate crawls outward from seed URLs looking for links that point at a
//! site's affiliate or partner program. Once such a page is reached it records
//! the contact signals found there (email addresses, presence of a form).

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod traversal;
pub mod url;

use thiserror::Error;

/// Main error type for Partner-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("At least one seed URL must be provided")]
    MissingSeeds,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

// Re-export commonly used types
pub use config::Config;
pub use traversal::{classify, extract, CrawlTask, Decision, ResultRecord, TraversalController};
