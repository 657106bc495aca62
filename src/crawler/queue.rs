//! Work queue for crawl tasks
//!
//! This module handles:
//! - FIFO ordering of pending tasks (breadth-first from the seeds)
//! - Deduplication of tasks by normalized URL and traversal state
//! - The global page budget (`max-pages-total`)

use crate::traversal::{CrawlTask, TraversalState, WorkQueue};
use crate::url::normalize_url;
use std::collections::{HashSet, VecDeque};

/// FIFO task queue with per-run deduplication and a page budget
///
/// A URL is accepted at most once as a probe and at most once as a partner
/// page, so a page first reached through fan-out can still be extracted when a
/// partner link points at it later.
#[derive(Debug)]
pub struct TaskQueue {
    pending: VecDeque<CrawlTask>,
    seen: HashSet<(String, TraversalState)>,
    max_pages: usize,
    dispatched: usize,
}

impl TaskQueue {
    /// Creates an empty queue that hands out at most `max_pages` tasks
    pub fn new(max_pages: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            seen: HashSet::new(),
            max_pages,
            dispatched: 0,
        }
    }

    /// Takes the next task, or `None` if the queue is empty or the budget is spent
    pub fn next_task(&mut self) -> Option<CrawlTask> {
        if self.budget_exhausted() {
            return None;
        }

        let task = self.pending.pop_front()?;
        self.dispatched += 1;
        Some(task)
    }

    /// Number of tasks handed out so far
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    pub fn budget_exhausted(&self) -> bool {
        self.dispatched >= self.max_pages
    }

    /// Number of tasks waiting to be handed out
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl WorkQueue for TaskQueue {
    fn add_task(&mut self, task: CrawlTask) -> bool {
        let key = match normalize_url(task.url()) {
            Ok(normalized) => normalized.to_string(),
            Err(e) => {
                tracing::debug!("Not queueing {}: {}", task.url(), e);
                return false;
            }
        };

        if !self.seen.insert((key, task.state())) {
            tracing::trace!("Already queued: {} ({})", task.url(), task.state());
            return false;
        }

        self.pending.push_back(task);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::new(10);
        assert!(queue.add_task(CrawlTask::seed(url("https://a.com/"))));
        assert!(queue.add_task(CrawlTask::seed(url("https://b.com/"))));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_task().unwrap().url().as_str(), "https://a.com/");
        assert_eq!(queue.next_task().unwrap().url().as_str(), "https://b.com/");
        assert!(queue.next_task().is_none());
        assert_eq!(queue.dispatched(), 2);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut queue = TaskQueue::new(10);
        assert!(queue.add_task(CrawlTask::seed(url("https://a.com/page"))));
        assert!(!queue.add_task(CrawlTask::seed(url("https://A.com/page/#top"))));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_duplicates_rejected_after_dispatch() {
        let mut queue = TaskQueue::new(10);
        queue.add_task(CrawlTask::seed(url("https://a.com/")));
        queue.next_task();
        assert!(!queue.add_task(CrawlTask::seed(url("https://a.com/"))));
    }

    #[test]
    fn test_partner_task_for_probed_url_accepted() {
        let mut queue = TaskQueue::new(10);
        let seed = CrawlTask::seed(url("https://a.com/"));
        assert!(queue.add_task(seed.follow_link(url("https://a.com/partners"))));
        assert!(queue.add_task(seed.follow_partner(url("https://a.com/partners"))));
        assert!(!queue.add_task(seed.follow_partner(url("https://a.com/partners"))));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_non_http_rejected() {
        let mut queue = TaskQueue::new(10);
        assert!(!queue.add_task(CrawlTask::seed(url("mailto:join@a.com"))));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_budget_limits_dispatch() {
        let mut queue = TaskQueue::new(2);
        for path in ["a", "b", "c"] {
            queue.add_task(CrawlTask::seed(url(&format!("https://a.com/{}", path))));
        }

        assert!(queue.next_task().is_some());
        assert!(queue.next_task().is_some());
        assert!(queue.budget_exhausted());
        assert!(queue.next_task().is_none());
        assert_eq!(queue.len(), 1);
    }
}
