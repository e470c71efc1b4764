//! Domain error types
//!
//! This module defines the error hierarchy for GA Export. Collaborator and
//! third-party failures are folded into [`ExportError`] so that a job record
//! can carry the root cause as plain text.

use super::ids::JobId;
use super::job::JobStatus;
use thiserror::Error;

/// Main GA Export error type
///
/// This is the primary error type used throughout the application. The
/// `Display` output of a variant is what ends up in a failed job's `error`
/// field, so messages are written for the person polling the job.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A job was dequeued but its request payload is gone
    #[error("No request payload stored for job {0}")]
    MissingRequest(JobId),

    /// The job store has no record for the given id
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    /// Failures while resolving controllers or listing field devices
    #[error("Data provider error: {0}")]
    DataProvider(String),

    /// Failures while rendering a workbook or archive
    #[error("Generation error: {0}")]
    Generation(String),

    /// Failures while persisting job records
    #[error("Job store error: {0}")]
    JobStore(String),

    /// A job state change that would move backwards or leave a terminal state
    #[error("Invalid job transition from {from} to {to}")]
    InvalidTransition {
        /// Status the job currently has
        from: JobStatus,
        /// Status the caller attempted to move to
        to: JobStatus,
    },

    /// Processing was cancelled through the cancellation signal
    #[error("Export cancelled: {0}")]
    Cancelled(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ExportError {
    /// Returns true if the error was caused by the cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExportError::Cancelled(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Generation(format!("workbook: {err}"))
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Generation(format!("archive: {err}"))
    }
}
