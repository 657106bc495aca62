//! Traversal controller
//!
//! Decides, for one visited task, what happens next:
//!
//! | State   | Condition                       | Decision                         |
//! |---------|---------------------------------|----------------------------------|
//! | Extract | -                               | emit one record, enqueue nothing |
//! | Probe   | partner candidate found         | enqueue exactly that candidate   |
//! | Probe   | no candidate, depth < max depth | enqueue every outbound link      |
//! | Probe   | no candidate, depth >= max      | nothing                          |
//!
//! The controller keeps no state between calls. The queue and the sink are
//! passed in by the caller on every [`TraversalController::handle`] call.

use crate::config::{Config, FanOutScope, HeuristicsConfig};
use crate::traversal::classifier::LinkClassifier;
use crate::traversal::contact::{extract_from_page, ResultRecord};
use crate::traversal::page::PageContent;
use crate::traversal::task::{CrawlTask, TraversalState};
use std::convert::Infallible;

/// Receives follow-up tasks from the controller
pub trait WorkQueue {
    /// Offers a task to the queue
    ///
    /// Returns false if the queue declined it (duplicate, unsupported URL).
    fn add_task(&mut self, task: CrawlTask) -> bool;
}

/// Receives extracted result records
pub trait ResultSink {
    type Error: std::fmt::Display;

    fn push_record(&mut self, record: ResultRecord) -> Result<(), Self::Error>;
}

impl WorkQueue for Vec<CrawlTask> {
    fn add_task(&mut self, task: CrawlTask) -> bool {
        self.push(task);
        true
    }
}

impl ResultSink for Vec<ResultRecord> {
    type Error = Infallible;

    fn push_record(&mut self, record: ResultRecord) -> Result<(), Self::Error> {
        self.push(record);
        Ok(())
    }
}

/// What to do after visiting one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Partner page: store this record, enqueue nothing
    Extract(ResultRecord),
    /// A partner candidate was found; enqueue only this task
    FollowPartner(CrawlTask),
    /// No candidate; enqueue all these probe tasks
    FanOut(Vec<CrawlTask>),
    /// No candidate and the depth ceiling is reached
    Stop,
}

impl Decision {
    /// Splits the decision into the record to emit and the tasks to enqueue
    ///
    /// For drivers that apply decisions themselves instead of going through
    /// [`TraversalController::handle`].
    ///
    /// # Example
    ///
    /// ```
    /// use partner_scout::config::{FanOutScope, HeuristicsConfig};
    /// use partner_scout::traversal::{CrawlTask, LinkCandidate, PageContent, TraversalController};
    /// use url::Url;
    ///
    /// let controller = TraversalController::new(&HeuristicsConfig::default(), 4, FanOutScope::SameHostname);
    /// let seed = CrawlTask::seed(Url::parse("https://example.com").unwrap());
    /// let page = PageContent {
    ///     links: vec![LinkCandidate::new("Affiliate Program", "/partners")],
    ///     ..PageContent::default()
    /// };
    ///
    /// let (record, tasks) = controller.decide(&seed, &page).into_parts();
    /// assert!(record.is_none());
    /// assert!(tasks[0].is_partner_page());
    /// ```
    pub fn into_parts(self) -> (Option<ResultRecord>, Vec<CrawlTask>) {
        match self {
            Self::Extract(record) => (Some(record), Vec::new()),
            Self::FollowPartner(task) => (None, vec![task]),
            Self::FanOut(tasks) => (None, tasks),
            Self::Stop => (None, Vec::new()),
        }
    }
}

/// Summary of an applied decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// A record was pushed to the sink
    Extracted,
    /// A partner task was offered; `accepted` is the queue's answer
    PartnerEnqueued { accepted: bool },
    /// `offered` probe tasks were offered, `accepted` of them were queued
    FannedOut { offered: usize, accepted: usize },
    /// Nothing was enqueued
    Stopped,
}

/// Per-page decision function over read-only configuration
#[derive(Debug, Clone)]
pub struct TraversalController {
    classifier: LinkClassifier,
    max_depth: u32,
    fan_out: FanOutScope,
}

impl TraversalController {
    pub fn new(heuristics: &HeuristicsConfig, max_depth: u32, fan_out: FanOutScope) -> Self {
        Self {
            classifier: LinkClassifier::new(heuristics),
            max_depth,
            fan_out,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.heuristics,
            config.crawler.max_depth,
            config.crawler.fan_out,
        )
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Decides what follows from visiting `task`, whose content is `page`
    pub fn decide(&self, task: &CrawlTask, page: &PageContent) -> Decision {
        match task.state() {
            TraversalState::Extract => {
                // Partner tasks always carry a source; fall back to the page itself
                let source = task.source_url().unwrap_or(task.url());
                Decision::Extract(extract_from_page(page, task.url(), source))
            }
            TraversalState::Probe => {
                if let Some(candidate) = self.classifier.classify(&page.links, task.url()) {
                    tracing::info!("Found partner link on {}: {}", task.url(), candidate);
                    return Decision::FollowPartner(task.follow_partner(candidate));
                }

                if task.depth() >= self.max_depth {
                    tracing::debug!(
                        "Depth limit {} reached at {}, not following links",
                        self.max_depth,
                        task.url()
                    );
                    return Decision::Stop;
                }

                let tasks = page
                    .outbound_links(task.url(), self.fan_out)
                    .into_iter()
                    .map(|url| task.follow_link(url))
                    .collect();
                Decision::FanOut(tasks)
            }
        }
    }

    /// Decides and applies the decision to the given queue and sink
    ///
    /// # Returns
    ///
    /// * `Ok(Visit)` - What was done
    /// * `Err(S::Error)` - The sink rejected the record
    pub fn handle<Q, S>(
        &self,
        task: &CrawlTask,
        page: &PageContent,
        queue: &mut Q,
        sink: &mut S,
    ) -> Result<Visit, S::Error>
    where
        Q: WorkQueue + ?Sized,
        S: ResultSink + ?Sized,
    {
        match self.decide(task, page) {
            Decision::Extract(record) => {
                tracing::info!(
                    "Extracted contact data from {} (emails: {}, form: {})",
                    record.partner_page_url,
                    record.emails_display(),
                    record.contact_form_display()
                );
                sink.push_record(record)?;
                Ok(Visit::Extracted)
            }
            Decision::FollowPartner(partner) => Ok(Visit::PartnerEnqueued {
                accepted: queue.add_task(partner),
            }),
            Decision::FanOut(tasks) => {
                let offered = tasks.len();
                let accepted = tasks
                    .into_iter()
                    .map(|t| queue.add_task(t))
                    .filter(|&added| added)
                    .count();
                Ok(Visit::FannedOut { offered, accepted })
            }
            Decision::Stop => Ok(Visit::Stopped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::traversal::page::LinkCandidate;
    use url::Url;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn controller(max_depth: u32) -> TraversalController {
        TraversalController::new(&HeuristicsConfig::default(), max_depth, FanOutScope::All)
    }

    fn page(links: &[(&str, &str)], markup: &str, has_form: bool) -> PageContent {
        PageContent {
            markup: markup.to_string(),
            links: links
                .iter()
                .map(|(text, href)| LinkCandidate::new(*text, *href))
                .collect(),
            has_form,
        }
    }

    /// Walks the seed down to the requested depth through plain links
    fn probe_at_depth(depth: u32) -> CrawlTask {
        let mut task = CrawlTask::seed(url("https://example.com"));
        for _ in 0..depth {
            task = task.follow_link(url("https://example.com"));
        }
        task
    }

    #[test]
    fn test_partner_candidate_short_circuits() {
        let seed = CrawlTask::seed(url("https://example.com"));
        let page = page(
            &[("About", "/about"), ("Affiliate Program", "/partners"), ("Blog", "/blog")],
            "",
            false,
        );

        let task = match controller(4).decide(&seed, &page) {
            Decision::FollowPartner(task) => task,
            other => panic!("expected a partner task, got {:?}", other),
        };

        assert_eq!(task.url().as_str(), "https://example.com/partners");
        assert_eq!(task.depth(), 1);
        assert!(task.is_partner_page());
        assert_eq!(task.source_url().map(Url::as_str), Some("https://example.com/"));
    }

    #[test]
    fn test_partner_page_extracts_and_stops() {
        let seed = CrawlTask::seed(url("https://example.com"));
        let partner = seed.follow_partner(url("https://example.com/partners"));
        // Even links that would match are not followed from a partner page
        let page = page(
            &[("More partners", "/partners/more")],
            "<p>join@example.com</p><form></form>",
            true,
        );

        let mut queue: Vec<CrawlTask> = Vec::new();
        let mut sink: Vec<ResultRecord> = Vec::new();
        let visit = controller(4)
            .handle(&partner, &page, &mut queue, &mut sink)
            .unwrap();

        assert_eq!(visit, Visit::Extracted);
        assert!(queue.is_empty());
        assert_eq!(sink.len(), 1);

        let record = &sink[0];
        assert_eq!(record.source_url.as_str(), "https://example.com/");
        assert_eq!(record.partner_page_url.as_str(), "https://example.com/partners");
        assert_eq!(record.emails_display(), "join@example.com");
        assert!(record.contact_form_exists);
    }

    #[test]
    fn test_fan_out_below_max_depth() {
        let seed = CrawlTask::seed(url("https://example.com"));
        let page = page(
            &[("About", "/about"), ("Blog", "/blog"), ("Elsewhere", "https://other.org/")],
            "",
            false,
        );

        let (record, tasks) = controller(4).decide(&seed, &page).into_parts();
        assert!(record.is_none());

        let urls: Vec<&str> = tasks.iter().map(|t| t.url().as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/about",
                "https://example.com/blog",
                "https://other.org/"
            ]
        );
        assert!(tasks.iter().all(|t| t.depth() == 1 && !t.is_partner_page()));
    }

    #[test]
    fn test_fan_out_same_hostname_scope() {
        let controller =
            TraversalController::new(&HeuristicsConfig::default(), 4, FanOutScope::SameHostname);
        let seed = CrawlTask::seed(url("https://example.com"));
        let page = page(&[("About", "/about"), ("Elsewhere", "https://other.org/")], "", false);

        let (_, tasks) = controller.decide(&seed, &page).into_parts();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].url().as_str(), "https://example.com/about");
    }

    #[test]
    fn test_no_fan_out_at_max_depth() {
        let task = probe_at_depth(4);
        let page = page(&[("About", "/about"), ("Blog", "/blog")], "", false);

        let mut queue: Vec<CrawlTask> = Vec::new();
        let mut sink: Vec<ResultRecord> = Vec::new();
        let visit = controller(4).handle(&task, &page, &mut queue, &mut sink).unwrap();

        assert_eq!(visit, Visit::Stopped);
        assert!(queue.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_partner_followed_even_at_max_depth() {
        let task = probe_at_depth(4);
        let page = page(&[("Referral program", "/referral")], "", false);

        let partner = match controller(4).decide(&task, &page) {
            Decision::FollowPartner(partner) => partner,
            other => panic!("expected a partner task, got {:?}", other),
        };
        assert_eq!(partner.depth(), 5);
    }

    #[test]
    fn test_max_depth_zero_only_probes_seeds() {
        let seed = CrawlTask::seed(url("https://example.com"));
        let page = page(&[("About", "/about")], "", false);
        assert_eq!(controller(0).decide(&seed, &page), Decision::Stop);
    }

    #[test]
    fn test_default_fan_out_stays_on_host() {
        let controller = TraversalController::new(
            &HeuristicsConfig::default(),
            4,
            CrawlerConfig::default().fan_out,
        );
        let seed = CrawlTask::seed(url("https://example.com"));
        let page = page(
            &[
                ("About", "/about"),
                ("Follow us", "https://twitter.com/acme"),
                ("Friends", "https://other-shop.example/"),
            ],
            "",
            false,
        );

        let (_, tasks) = controller.decide(&seed, &page).into_parts();
        let urls: Vec<&str> = tasks.iter().map(|t| t.url().as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/about"]);
    }

    #[test]
    fn test_ignored_links_are_still_fanned_out() {
        let controller =
            TraversalController::new(&HeuristicsConfig::default(), 4, FanOutScope::All);
        let seed = CrawlTask::seed(url("https://example.com"));
        let page = page(&[("Our partners on Twitter", "https://twitter.com/acme")], "", false);

        let (_, tasks) = controller.decide(&seed, &page).into_parts();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].url().as_str(), "https://twitter.com/acme");
        assert!(!tasks[0].is_partner_page());
    }

    struct RejectingQueue;

    impl WorkQueue for RejectingQueue {
        fn add_task(&mut self, _task: CrawlTask) -> bool {
            false
        }
    }

    #[test]
    fn test_handle_reports_queue_answers() {
        let seed = CrawlTask::seed(url("https://example.com"));
        let page = page(&[("About", "/about"), ("Blog", "/blog")], "", false);

        let mut sink: Vec<ResultRecord> = Vec::new();
        let visit = controller(4)
            .handle(&seed, &page, &mut RejectingQueue, &mut sink)
            .unwrap();
        assert_eq!(
            visit,
            Visit::FannedOut {
                offered: 2,
                accepted: 0
            }
        );
    }

    #[test]
    fn test_controller_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TraversalController>();
    }
}
