//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output for interactive runs
//! - Configurable log levels
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use ga_export::logging::init_logging;
//! use ga_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a job entering a pipeline phase
///
/// # Example
///
/// ```no_run
/// use ga_export::log_job_phase;
/// use ga_export::domain::JobId;
///
/// let job_id = JobId::new();
/// log_job_phase!(&job_id, 5, "resolving controllers");
/// ```
#[macro_export]
macro_rules! log_job_phase {
    ($job_id:expr, $progress:expr, $message:expr) => {
        tracing::info!(
            job_id = %$job_id,
            progress = $progress,
            phase = $message,
            "Job phase"
        );
    };
}

/// Log a job that reached the `failed` state
///
/// # Example
///
/// ```no_run
/// use ga_export::log_job_failed;
/// use ga_export::domain::{ExportError, JobId};
///
/// let job_id = JobId::new();
/// let error = ExportError::DataProvider("connection refused".to_string());
/// log_job_failed!(&job_id, &error);
/// ```
#[macro_export]
macro_rules! log_job_failed {
    ($job_id:expr, $error:expr) => {
        tracing::error!(
            job_id = %$job_id,
            error = %$error,
            "Export job failed"
        );
    };
}

/// Log the completion of an export job
///
/// # Example
///
/// ```no_run
/// use ga_export::log_job_complete;
/// use std::time::Duration;
///
/// log_job_complete!("7d44b88c-4199-4bad-97dc-d78268e01398", 1200, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_job_complete {
    ($job_id:expr, $devices:expr, $duration:expr) => {
        tracing::info!(
            job_id = %$job_id,
            devices = $devices,
            duration_ms = $duration.as_millis(),
            "Export job completed"
        );
    };
}
