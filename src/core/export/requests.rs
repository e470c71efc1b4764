//! Pending request payloads
//!
//! Each job keeps its request from submission until the job is taken for
//! processing or abandoned. This map is the only mutable state the core
//! owns; every access goes through one mutex.

use crate::domain::{ExportRequest, JobId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Request payloads keyed by job id
#[derive(Debug, Default)]
pub struct PendingRequests {
    inner: Mutex<HashMap<JobId, ExportRequest>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    // The map holds plain data; a panic elsewhere cannot leave it inconsistent
    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, ExportRequest>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the payload for `job_id`, replacing any previous one
    pub fn insert(&self, job_id: JobId, request: ExportRequest) {
        self.lock().insert(job_id, request);
    }

    /// Copy of the payload for `job_id`
    pub fn get(&self, job_id: &JobId) -> Option<ExportRequest> {
        self.lock().get(job_id).cloned()
    }

    /// Discard the payload for `job_id`
    pub fn remove(&self, job_id: &JobId) -> Option<ExportRequest> {
        self.lock().remove(job_id)
    }

    /// Number of stored payloads
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
