//! Traversal core: page classification and the per-page crawl decision
//!
//! Everything in this module is synchronous and free of shared mutable
//! state. The crawl driver calls [`TraversalController::decide`] (or
//! [`TraversalController::handle`]) once per fetched page, possibly from many
//! tasks at once.
//!
//! - [`classifier`] picks at most one partner-candidate link from a page
//! - [`contact`] turns a partner page into a [`ResultRecord`]
//! - [`controller`] chains the two under the depth ceiling

pub mod classifier;
pub mod contact;
pub mod controller;
mod page;
mod task;

pub use classifier::{classify, LinkClassifier};
pub use contact::{extract, extract_from_page, ResultRecord, NO_EMAILS_FOUND};
pub use controller::{Decision, ResultSink, TraversalController, Visit, WorkQueue};
pub use page::{LinkCandidate, PageContent};
pub use task::{CrawlTask, TraversalState};
