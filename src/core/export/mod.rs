//! Export job processing
//!
//! This module provides the core export logic for GA Export, including:
//! - Pending request payloads keyed by job id
//! - The phase-by-phase export pipeline
//! - The orchestrator with its bounded queue and worker pool

pub mod orchestrator;
pub mod pipeline;
pub mod requests;

pub use orchestrator::{ExportOrchestrator, WorkerSettings};
pub use pipeline::{ExportPipeline, PipelineSettings};
pub use requests::PendingRequests;
