//! Output file naming

use crate::domain::{JobId, OutputType};
use std::path::PathBuf;

/// Builds output locations for export jobs
pub trait FileStore: Send + Sync {
    /// Deterministic, collision-free output path and download name for a job
    fn build_output_path(&self, job_id: &JobId, output_type: OutputType) -> (PathBuf, String);
}

/// File store writing every export into one local directory
///
/// # Examples
///
/// ```
/// use ga_export::adapters::files::{FileStore, LocalFileStore};
/// use ga_export::domain::{JobId, OutputType};
///
/// let store = LocalFileStore::new("/var/exports");
/// let job_id: JobId = "7d44b88c-4199-4bad-97dc-d78268e01398".parse().unwrap();
/// let (path, name) = store.build_output_path(&job_id, OutputType::Zip);
///
/// assert_eq!(name, "export-7d44b88c-4199-4bad-97dc-d78268e01398.zip");
/// assert!(path.ends_with(&name));
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    output_dir: PathBuf,
}

impl LocalFileStore {
    /// Create a store rooted at `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory receiving generated files
    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }
}

impl FileStore for LocalFileStore {
    fn build_output_path(&self, job_id: &JobId, output_type: OutputType) -> (PathBuf, String) {
        let file_name = format!("export-{}.{}", job_id, output_type.extension());
        (self.output_dir.join(&file_name), file_name)
    }
}
