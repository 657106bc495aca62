//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Seeding the work queue
//! - Dispatching concurrent fetch + parse jobs
//! - Running the traversal controller on every fetched page
//! - Recording results and run status in storage

use crate::config::{seed_urls, Config};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError, RetryPolicy};
use crate::crawler::parser::parse_page;
use crate::crawler::queue::TaskQueue;
use crate::storage::{RunSink, RunStatus, SqliteStorage, Storage};
use crate::traversal::{CrawlTask, PageContent, TraversalController, Visit, WorkQueue};
use crate::ScoutError;
use reqwest::Client;
use std::path::Path;
use tokio::task::JoinSet;

/// Counters collected over one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Tasks handed to the fetcher, counted against the page budget
    pub pages_dispatched: usize,
    /// Pages fetched and handed to the controller
    pub pages_visited: usize,
    /// Tasks whose fetch failed
    pub fetch_failures: usize,
    /// Partner candidates found on probe pages
    pub partner_links_found: usize,
    /// Result records stored
    pub records_stored: usize,
    /// Result records the sink rejected
    pub records_failed: usize,
    /// Tasks still queued when the page budget ran out
    pub tasks_dropped: usize,
}

type FetchOutcome = (CrawlTask, Result<PageContent, FetchError>);

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    controller: TraversalController,
    storage: SqliteStorage,
    queue: TaskQueue,
    client: Client,
    retry: RetryPolicy,
    run_id: i64,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a coordinator writing to the configured database
    ///
    /// Fails with [`crate::ConfigError::MissingSeeds`] before touching the
    /// database or the network when the seed list is empty.
    pub fn new(config: Config, config_hash: &str) -> Result<Self, ScoutError> {
        seed_urls(&config.seeds)?;
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        Self::with_storage(config, storage, config_hash)
    }

    /// Creates a coordinator over an already opened storage backend
    pub fn with_storage(
        config: Config,
        mut storage: SqliteStorage,
        config_hash: &str,
    ) -> Result<Self, ScoutError> {
        let seeds = seed_urls(&config.seeds)?;

        let client = build_http_client(&config.user_agent, config.crawler.request_timeout_secs)?;
        let controller = TraversalController::from_config(&config);
        let retry = RetryPolicy::from_config(&config.crawler);

        let mut queue = TaskQueue::new(config.crawler.max_pages_total as usize);
        for url in seeds {
            if !queue.add_task(CrawlTask::seed(url.clone())) {
                tracing::warn!("Skipping duplicate seed URL: {}", url);
            }
        }

        let run_id = storage.create_run(config_hash)?;

        Ok(Self {
            config,
            controller,
            storage,
            queue,
            client,
            retry,
            run_id,
            stats: CrawlStats::default(),
        })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn into_storage(self) -> SqliteStorage {
        self.storage
    }

    /// Runs the crawl until the queue drains or the page budget is spent
    ///
    /// Fetch failures and rejected records are counted and logged without
    /// stopping the crawl. The run is stored as failed if any record was lost.
    pub async fn run(&mut self) -> Result<CrawlStats, ScoutError> {
        tracing::info!(
            "Starting crawl run {} ({} seeds, max depth {}, max pages {})",
            self.run_id,
            self.queue.len(),
            self.controller.max_depth(),
            self.config.crawler.max_pages_total
        );

        let start_time = std::time::Instant::now();
        let max_in_flight = self.config.crawler.max_concurrency.max(1) as usize;
        let mut in_flight: JoinSet<FetchOutcome> = JoinSet::new();

        loop {
            while in_flight.len() < max_in_flight {
                let Some(task) = self.queue.next_task() else {
                    break;
                };
                self.dispatch(&mut in_flight, task);
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((task, Ok(page))) => self.visit(&task, &page),
                Ok((task, Err(e))) => {
                    tracing::warn!("Failed to fetch {}: {}", task.url(), e);
                    self.stats.fetch_failures += 1;
                }
                Err(e) => {
                    tracing::error!("Fetch job aborted: {}", e);
                    self.stats.fetch_failures += 1;
                }
            }
        }

        self.stats.pages_dispatched = self.queue.dispatched();

        if self.queue.budget_exhausted() && !self.queue.is_empty() {
            self.stats.tasks_dropped = self.queue.len();
            tracing::info!(
                "Page budget of {} reached, {} queued tasks not visited",
                self.config.crawler.max_pages_total,
                self.stats.tasks_dropped
            );
        }

        // Lost records mark the run failed; it still ran to the end
        let status = if self.stats.records_failed > 0 {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        };
        self.storage.finish_run(self.run_id, status)?;

        let stored = self.storage.count_records(self.run_id)?;
        tracing::info!(
            "Crawl completed in {:?}: {} pages visited of {} dispatched, {} failed, {} partner links, {} records in run {}",
            start_time.elapsed(),
            self.stats.pages_visited,
            self.stats.pages_dispatched,
            self.stats.fetch_failures,
            self.stats.partner_links_found,
            stored,
            self.run_id
        );

        Ok(self.stats)
    }

    /// Spawns the fetch + parse job for one task
    fn dispatch(&self, in_flight: &mut JoinSet<FetchOutcome>, task: CrawlTask) {
        tracing::info!(
            "Processing: {} (depth {}, {})",
            task.url(),
            task.depth(),
            task.state()
        );

        let client = self.client.clone();
        let retry = self.retry;

        in_flight.spawn(async move {
            let result = fetch_page(&client, task.url().as_str(), retry)
                .await
                .map(|fetched| {
                    if fetched.final_url != task.url().as_str() {
                        tracing::debug!("{} redirected to {}", task.url(), fetched.final_url);
                    }
                    parse_page(&fetched.body)
                });
            (task, result)
        });
    }

    /// Runs the traversal controller on one fetched page
    fn visit(&mut self, task: &CrawlTask, page: &PageContent) {
        self.stats.pages_visited += 1;

        let mut sink = RunSink::new(&mut self.storage, self.run_id);
        match self
            .controller
            .handle(task, page, &mut self.queue, &mut sink)
        {
            Ok(Visit::Extracted) => self.stats.records_stored += 1,
            Ok(Visit::PartnerEnqueued { accepted }) => {
                self.stats.partner_links_found += 1;
                if !accepted {
                    tracing::debug!("Partner page from {} was already queued", task.url());
                }
            }
            Ok(Visit::FannedOut { offered, accepted }) => {
                tracing::debug!(
                    "Queued {} of {} links from {}",
                    accepted,
                    offered,
                    task.url()
                );
            }
            Ok(Visit::Stopped) => {}
            Err(e) => {
                tracing::error!("Failed to store record for {}: {}", task.url(), e);
                self.stats.records_failed += 1;
            }
        }
    }
}

/// Runs a complete crawl against the configured database
///
/// # Example
///
/// ```no_run
/// use partner_scout::config::load_config_with_hash;
/// use partner_scout::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let stats = run_crawl(config, &hash).await?;
/// println!("{} records", stats.records_stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<CrawlStats, ScoutError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CrawlerConfig, HeuristicsConfig, OutputConfig, SeedEntry, UserAgentConfig,
    };
    use crate::ConfigError;

    fn create_test_config(seeds: Vec<SeedEntry>) -> Config {
        Config {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig {
                crawler_name: "TestScout".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            output: OutputConfig {
                database_path: "/nonexistent/dir/should-not-be-created.db".to_string(),
                summary_path: "./summary.md".to_string(),
            },
            heuristics: HeuristicsConfig::default(),
            seeds,
        }
    }

    #[test]
    fn test_empty_seeds_abort_before_storage() {
        let result = Coordinator::new(create_test_config(Vec::new()), "hash");
        assert!(matches!(
            result,
            Err(ScoutError::Config(ConfigError::MissingSeeds))
        ));
    }

    #[test]
    fn test_creation_records_run_and_seeds() {
        let config = create_test_config(vec![
            SeedEntry {
                url: "https://example.com".to_string(),
            },
            SeedEntry {
                url: "https://example.com/".to_string(),
            },
        ]);
        let storage = SqliteStorage::open_in_memory().unwrap();

        let coordinator = Coordinator::with_storage(config, storage, "hash").unwrap();

        assert_eq!(coordinator.queue.len(), 1);
        let run = coordinator.storage().get_run(coordinator.run_id()).unwrap();
        assert_eq!(run.status, RunStatus::Running);
    }
}
