//! Export job model
//!
//! A [`Job`] tracks one export request from submission to a terminal state.
//! The record owns its state machine: every mutation goes through a method
//! that refuses to move the status backwards or to touch a terminal job.

use super::errors::ExportError;
use super::ids::JobId;
use super::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message stored on a freshly submitted job
pub const MSG_QUEUED: &str = "queued";
/// Message stored while controllers are resolved
pub const MSG_RESOLVING: &str = "resolving controllers";
/// Message stored after each controller's devices have been collected
pub const MSG_COLLECTING: &str = "collecting field devices";
/// Message stored while the output file is rendered
pub const MSG_GENERATING: &str = "generating file";
/// Message stored on success
pub const MSG_COMPLETED: &str = "completed";
/// Message stored on failure
pub const MSG_FAILED: &str = "failed";

/// Job status enumeration
///
/// Status only ever moves forward: `queued → processing → {completed|failed}`.
/// A queued job may also fail directly when it can never be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for a worker
    Queued,
    /// A worker (or the caller) is running the pipeline
    Processing,
    /// Output file is ready
    Completed,
    /// Pipeline failed; see `error`
    Failed,
}

impl JobStatus {
    /// Returns true for `Completed` and `Failed`
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Returns the wire name of the status
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    fn can_move_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Queued, JobStatus::Failed)
                | (JobStatus::Processing, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queued" => Ok(JobStatus::Queued),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!(
                "Invalid job status '{other}'. Must be one of: queued, processing, completed, failed"
            )),
        }
    }
}

/// Kind of file an export produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// Single multi-sheet workbook
    Excel,
    /// Archive with one workbook per control cabinet
    Zip,
}

impl OutputType {
    /// Picks the output type for a resolved device count
    ///
    /// Counts up to and including `single_file_limit` fit in one workbook.
    ///
    /// ```
    /// use ga_export::domain::job::OutputType;
    ///
    /// assert_eq!(OutputType::for_device_count(5000, 5000), OutputType::Excel);
    /// assert_eq!(OutputType::for_device_count(5001, 5000), OutputType::Zip);
    /// ```
    pub fn for_device_count(total_devices: usize, single_file_limit: usize) -> Self {
        if total_devices <= single_file_limit {
            OutputType::Excel
        } else {
            OutputType::Zip
        }
    }

    /// MIME type served for the file
    pub fn content_type(self) -> &'static str {
        match self {
            OutputType::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            OutputType::Zip => "application/zip",
        }
    }

    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputType::Excel => "xlsx",
            OutputType::Zip => "zip",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::Excel => f.write_str("excel"),
            OutputType::Zip => f.write_str("zip"),
        }
    }
}

/// Export job record
///
/// # Examples
///
/// ```
/// use ga_export::domain::ids::JobId;
/// use ga_export::domain::job::{Job, JobStatus};
///
/// let mut job = Job::queued(JobId::new());
/// job.start_processing(5, "resolving controllers").unwrap();
/// job.report_progress(40, "collecting field devices").unwrap();
/// job.fail("data provider unavailable").unwrap();
///
/// assert_eq!(job.status, JobStatus::Failed);
/// assert_eq!(job.progress, 40);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier
    pub id: JobId,

    /// Current lifecycle status
    pub status: JobStatus,

    /// Progress percentage (0-100)
    pub progress: u8,

    /// Last attempted phase, human readable
    pub message: String,

    /// Output kind, known once devices have been counted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<OutputType>,

    /// Download file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// MIME type, set on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Location of the generated file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Root cause of a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the job was submitted
    pub created_at: DateTime<Utc>,

    /// When the job record last changed
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a new job in the `Queued` state
    pub fn queued(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Queued,
            progress: 0,
            message: MSG_QUEUED.to_string(),
            output_type: None,
            file_name: None,
            content_type: None,
            file_path: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true once the job can no longer change
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves a queued job to `Processing`
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidTransition`] unless the job is queued.
    pub fn start_processing(&mut self, progress: u8, message: impl Into<String>) -> Result<()> {
        if self.status != JobStatus::Queued {
            return Err(ExportError::InvalidTransition {
                from: self.status,
                to: JobStatus::Processing,
            });
        }
        self.status = JobStatus::Processing;
        self.advance(progress, message);
        Ok(())
    }

    /// Records progress on a processing job
    ///
    /// Progress never decreases; a lower value keeps the current one.
    pub fn report_progress(&mut self, progress: u8, message: impl Into<String>) -> Result<()> {
        self.transition(JobStatus::Processing)?;
        self.advance(progress, message);
        Ok(())
    }

    /// Stores where the output will be written
    pub fn assign_output(
        &mut self,
        output_type: OutputType,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Result<()> {
        self.transition(JobStatus::Processing)?;
        self.output_type = Some(output_type);
        self.file_name = Some(file_name.into());
        self.file_path = Some(file_path.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Marks a processing job as completed
    ///
    /// # Errors
    ///
    /// Fails if the job is not processing or no output was assigned.
    pub fn complete(&mut self) -> Result<()> {
        self.transition(JobStatus::Completed)?;
        let output_type = self.output_type.ok_or_else(|| {
            ExportError::Validation(format!("job {} has no output assigned", self.id))
        })?;
        self.status = JobStatus::Completed;
        self.content_type = Some(output_type.content_type().to_string());
        self.error = None;
        self.advance(100, MSG_COMPLETED);
        Ok(())
    }

    /// Marks a non-terminal job as failed, keeping the error text verbatim
    pub fn fail(&mut self, error: impl Into<String>) -> Result<()> {
        self.transition(JobStatus::Failed)?;
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.message = MSG_FAILED.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    fn transition(&self, next: JobStatus) -> Result<()> {
        if self.status.can_move_to(next) {
            Ok(())
        } else {
            Err(ExportError::InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }

    fn advance(&mut self, progress: u8, message: impl Into<String>) {
        self.progress = self.progress.max(progress.min(100));
        self.message = message.into();
        self.updated_at = Utc::now();
    }
}
