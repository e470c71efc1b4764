//! JSON file job store
//!
//! Each job is stored as `<dir>/<job-id>.json`. Records are written to a
//! temporary sibling first and renamed into place, so a reader never observes
//! a half-written document.

use super::JobStore;
use crate::domain::{ExportError, Job, JobId, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const RECORD_EXTENSION: &str = "json";

/// Job store keeping one pretty-printed JSON document per job
pub struct JsonFileJobStore {
    dir: PathBuf,
    /// Serializes create/update so existence checks and writes do not interleave
    write_lock: Mutex<()>,
}

impl JsonFileJobStore {
    /// Create a store rooted at `dir`
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the job documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &JobId) -> PathBuf {
        self.dir.join(format!("{id}.{RECORD_EXTENSION}"))
    }

    async fn write_record(&self, job: &Job) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ExportError::JobStore(format!(
                "failed to create job directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.record_path(&job.id);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(job)?;

        tokio::fs::write(&tmp, body).await.map_err(|e| {
            ExportError::JobStore(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            ExportError::JobStore(format!("failed to move {} into place: {}", path.display(), e))
        })?;
        Ok(())
    }

    async fn read_record(path: &Path) -> Result<Job> {
        let body = tokio::fs::read(path).await.map_err(|e| {
            ExportError::JobStore(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_slice(&body).map_err(|e| {
            ExportError::JobStore(format!("corrupt job record {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl JobStore for JsonFileJobStore {
    async fn create(&self, job: &Job) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(self.record_path(&job.id)).await? {
            return Err(ExportError::JobStore(format!("job {} already exists", job.id)));
        }
        self.write_record(job).await
    }

    async fn update(&self, job: &Job) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !tokio::fs::try_exists(self.record_path(&job.id)).await? {
            return Err(ExportError::JobNotFound(job.id.clone()));
        }
        self.write_record(job).await
    }

    async fn get(&self, id: &JobId) -> Result<Option<Job>> {
        let path = self.record_path(id);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        Self::read_record(&path).await.map(Some)
    }

    async fn list(&self) -> Result<Vec<Job>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut jobs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            match Self::read_record(&path).await {
                Ok(job) => jobs.push(job),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable job record"),
            }
        }

        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::MSG_RESOLVING;
    use crate::domain::{JobStatus, OutputType};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_roundtrip_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileJobStore::new(dir.path().join("jobs"));

        let mut job = Job::queued(JobId::new());
        store.create(&job).await.unwrap();

        job.start_processing(5, MSG_RESOLVING).unwrap();
        job.assign_output(OutputType::Excel, "export.xlsx", "/tmp/export.xlsx")
            .unwrap();
        store.update(&job).await.unwrap();

        // A second store over the same directory sees the record
        let other = JsonFileJobStore::new(dir.path().join("jobs"));
        let loaded = other.get(&job.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Processing);
        assert_eq!(loaded.output_type, Some(OutputType::Excel));
        assert!(!dir
            .path()
            .join("jobs")
            .join(format!("{}.json.tmp", job.id))
            .exists());
    }

    #[tokio::test]
    async fn test_duplicate_and_unknown() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileJobStore::new(dir.path());
        let job = Job::queued(JobId::new());

        assert!(matches!(
            store.update(&job).await,
            Err(ExportError::JobNotFound(_))
        ));
        store.create(&job).await.unwrap();
        assert!(matches!(
            store.create(&job).await,
            Err(ExportError::JobStore(_))
        ));
    }

    #[tokio::test]
    async fn test_list_skips_foreign_and_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileJobStore::new(dir.path());

        let first = Job::queued(JobId::new());
        let second = Job::queued(JobId::new());
        store.create(&first).await.unwrap();
        store.create(&second).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();

        let jobs = store.list().await.unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileJobStore::new(dir.path().join("never-created"));
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get(&JobId::new()).await.unwrap().is_none());
    }
}
