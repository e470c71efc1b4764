//! Domain models and types for GA Export.
//!
//! This module contains the core domain models and error types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Job identifiers and records** ([`JobId`], [`Job`], [`JobStatus`], [`OutputType`])
//! - **Export requests** ([`ExportRequest`])
//! - **Asset hierarchy** ([`Controller`], [`FieldDevice`], [`BacnetObject`], ...)
//! - **Error types** ([`ExportError`]) and the [`Result`] alias
//!
//! # Job lifecycle
//!
//! ```rust
//! use ga_export::domain::{Job, JobId, JobStatus, OutputType};
//!
//! # fn example() -> ga_export::domain::Result<()> {
//! let mut job = Job::queued(JobId::new());
//! job.start_processing(5, "resolving controllers")?;
//! job.assign_output(OutputType::Excel, "export.xlsx", "/tmp/export.xlsx")?;
//! job.complete()?;
//! assert_eq!(job.status, JobStatus::Completed);
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod errors;
pub mod ids;
pub mod job;
pub mod request;
pub mod result;

// Re-export commonly used types for convenience
pub use assets::{
    AlarmDefinition, BacnetObject, Building, Classification, ControlCabinet, Controller,
    FieldDevice, NotificationClass, Project, Specification, SpsController, StateText, SystemType,
};
pub use errors::ExportError;
pub use ids::JobId;
pub use job::{Job, JobStatus, OutputType};
pub use request::ExportRequest;
pub use result::Result;
