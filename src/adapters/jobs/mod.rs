//! Job store abstraction
//!
//! This module defines the trait job stores must implement, plus two bundled
//! implementations:
//!
//! - [`memory::InMemoryJobStore`] - process-local map, torn down with the process
//! - [`file::JsonFileJobStore`] - one JSON document per job, readable across processes

pub mod file;
pub mod memory;

pub use file::JsonFileJobStore;
pub use memory::InMemoryJobStore;

use crate::domain::{Job, JobId, Result};
use async_trait::async_trait;

/// Keyed persistence for job records
///
/// Implementations must keep a single job's record consistent under
/// concurrent access. The orchestrator guarantees that only one worker owns
/// a given job id at a time.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new job record
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ExportError::JobStore`] if a job with the
    /// same id already exists or the record cannot be written.
    async fn create(&self, job: &Job) -> Result<()>;

    /// Replace an existing job record
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ExportError::JobNotFound`] if the job was
    /// never created.
    async fn update(&self, job: &Job) -> Result<()>;

    /// Load a job record
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(Job))` if found, `Ok(None)` if not found.
    async fn get(&self, id: &JobId) -> Result<Option<Job>>;

    /// Load every job record, oldest first
    async fn list(&self) -> Result<Vec<Job>>;
}
