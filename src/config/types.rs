use serde::Deserialize;

/// Main configuration structure for Partner-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    #[serde(default)]
    pub seeds: Vec<SeedEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link-hops from a seed before a probe path stops fanning out
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Hard cap on pages fetched per run, independent of depth
    #[serde(rename = "max-pages-total", default = "default_max_pages_total")]
    pub max_pages_total: u32,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Retries after the first failed attempt for transient errors
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries (milliseconds), multiplied by the attempt number
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Which outbound links a probe page fans out to
    #[serde(rename = "fan-out", default)]
    pub fan_out: FanOutScope,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_pages_total: default_max_pages_total(),
            max_concurrency: default_max_concurrency(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            fan_out: FanOutScope::default(),
        }
    }
}

/// Scope of the fan-out performed when a probe page has no partner candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FanOutScope {
    /// Every resolvable http(s) link on the page
    All,
    /// Only links on the same host as the page
    #[default]
    SameHostname,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding result records
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown report file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

/// Link-scoring heuristic inputs
#[derive(Debug, Clone, Deserialize)]
pub struct HeuristicsConfig {
    /// Substrings that mark a link as a partner candidate (ordered)
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Substrings that exclude a link from consideration
    #[serde(rename = "ignored-domains", default = "default_ignored_domains")]
    pub ignored_domains: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            ignored_domains: default_ignored_domains(),
        }
    }
}

impl HeuristicsConfig {
    /// Lower-cases and trims every keyword and ignored domain in place
    pub fn normalize(&mut self) {
        for keyword in &mut self.keywords {
            *keyword = keyword.trim().to_lowercase();
        }
        for domain in &mut self.ignored_domains {
            *domain = domain.trim().to_lowercase();
        }
    }
}

/// A seed URL entry
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub url: String,
}

fn default_max_depth() -> u32 {
    4
}

fn default_max_pages_total() -> u32 {
    50
}

fn default_max_concurrency() -> u32 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Default partner-program keywords
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "affiliate",
    "partner",
    "program",
    "join",
    "referral",
    "collab",
    "colabora",
    "monetize",
    "embassador",
    "socios",
    "developers",
    "integrations",
];

/// Community and social networks that are never a direct partner program
pub const DEFAULT_IGNORED_DOMAINS: &[&str] = &[
    "twitter.com",
    "facebook.com",
    "discord.gg",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
    "t.me",
    "reddit.com",
    "github.com",
];

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_ignored_domains() -> Vec<String> {
    DEFAULT_IGNORED_DOMAINS.iter().map(|d| d.to_string()).collect()
}
