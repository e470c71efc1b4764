//! Core business logic for GA Export.
//!
//! # Modules
//!
//! - [`export`] - Job lifecycle, pipeline phases and the worker pool
//! - [`output`] - Workbook and archive generators
//!
//! # Export Workflow
//!
//! 1. **Submit**: the job is persisted as `queued` with its request payload
//! 2. **Resolve**: controllers in scope are resolved by the data provider
//! 3. **Collect**: field devices are fetched page by page per controller
//! 4. **Decide**: small exports become one workbook, large ones a zip archive
//! 5. **Generate**: the file is rendered on the blocking pool
//! 6. **Finalize**: the job is marked `completed` or `failed`
//!
//! # Example
//!
//! ```rust,no_run
//! use ga_export::adapters::files::LocalFileStore;
//! use ga_export::adapters::jobs::InMemoryJobStore;
//! use ga_export::adapters::provider::{AssetSnapshot, InMemoryDataProvider};
//! use ga_export::core::export::{ExportOrchestrator, ExportPipeline, PipelineSettings, WorkerSettings};
//! use ga_export::domain::ExportRequest;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = InMemoryDataProvider::new(AssetSnapshot::from_file("assets.json")?);
//! let pipeline = ExportPipeline::new(
//!     Arc::new(provider),
//!     Arc::new(InMemoryJobStore::new()),
//!     Arc::new(LocalFileStore::new("./exports")),
//!     PipelineSettings::default(),
//! );
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let orchestrator =
//!     ExportOrchestrator::start(Arc::new(pipeline), WorkerSettings::default(), shutdown_rx)?;
//!
//! let job = orchestrator.create(ExportRequest::new()).await?;
//! println!("{} is {}", job.id, job.status);
//!
//! orchestrator.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod output;
