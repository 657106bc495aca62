//! Output module for crawl reports
//!
//! This module turns the result records of a run into a human-readable
//! markdown report.

mod markdown;

pub use markdown::{format_markdown_report, write_markdown_report, CrawlReport};

use crate::storage::{Storage, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No crawl runs found in database")]
    NoRuns,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Loads the report for the most recent run
pub fn load_latest_report(storage: &dyn Storage) -> OutputResult<CrawlReport> {
    let run = storage.get_latest_run()?.ok_or(OutputError::NoRuns)?;
    load_report(storage, run.id)
}

/// Loads the report for a specific run
pub fn load_report(storage: &dyn Storage, run_id: i64) -> OutputResult<CrawlReport> {
    let run = storage.get_run(run_id)?;
    let records = storage.load_records(run_id)?;
    Ok(CrawlReport { run, records })
}
