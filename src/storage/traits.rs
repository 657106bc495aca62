//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{RunRecord, RunStatus};
use crate::traversal::{ResultRecord, ResultSink};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as finished with the given status and a finish timestamp
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Result Records =====

    /// Appends a result record to a run
    fn insert_record(&mut self, run_id: i64, record: &ResultRecord) -> StorageResult<i64>;

    /// Loads all records of a run in insertion order
    fn load_records(&self, run_id: i64) -> StorageResult<Vec<ResultRecord>>;

    /// Counts the records of a run
    fn count_records(&self, run_id: i64) -> StorageResult<u64>;
}

/// Result sink that appends records to one run of a [`Storage`] backend
pub struct RunSink<'a, S: Storage + ?Sized> {
    storage: &'a mut S,
    run_id: i64,
}

impl<'a, S: Storage + ?Sized> RunSink<'a, S> {
    pub fn new(storage: &'a mut S, run_id: i64) -> Self {
        Self { storage, run_id }
    }
}

impl<S: Storage + ?Sized> ResultSink for RunSink<'_, S> {
    type Error = StorageError;

    fn push_record(&mut self, record: ResultRecord) -> Result<(), Self::Error> {
        self.storage.insert_record(self.run_id, &record)?;
        Ok(())
    }
}
