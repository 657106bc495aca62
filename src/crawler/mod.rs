//! Crawler module for web page fetching and processing
//!
//! This module contains the crawl driver around the traversal core:
//! - HTTP fetching with retry logic
//! - HTML parsing into owned page content
//! - The deduplicating FIFO work queue and page budget
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod queue;

pub use coordinator::{run_crawl, Coordinator, CrawlStats};
pub use fetcher::{
    build_http_client, fetch_page, is_retryable_status, user_agent_string, FetchError,
    FetchedPage, RetryPolicy,
};
pub use parser::parse_page;
pub use queue::TaskQueue;

