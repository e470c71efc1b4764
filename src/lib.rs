// GA Export - Building Automation Data Point Exporter
// Copyright (c) 2025 GA Export Contributors
// Licensed under the MIT License

//! # GA Export - Building Automation Data Point Exporter
//!
//! GA Export turns the asset hierarchy of a building automation project
//! (projects, buildings, control cabinets, controllers, field devices and
//! their BACnet objects) into data point lists for commissioning.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** an export scope to the controllers it covers
//! - **Collecting** field devices page by page
//! - **Generating** one workbook (one sheet per controller) or, for large
//!   exports, a zip archive with one workbook per control cabinet
//! - **Tracking** each export as a job with status and progress
//!
//! ## Architecture
//!
//! GA Export follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export pipeline, orchestrator, file generators)
//! - [`adapters`] - Data provider, job store and file store implementations
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ga_export::adapters::files::LocalFileStore;
//! use ga_export::adapters::jobs::InMemoryJobStore;
//! use ga_export::adapters::provider::{AssetSnapshot, InMemoryDataProvider};
//! use ga_export::core::export::{ExportOrchestrator, ExportPipeline, PipelineSettings, WorkerSettings};
//! use ga_export::domain::ExportRequest;
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let snapshot = AssetSnapshot::from_file("assets.json")?;
//!     let pipeline = ExportPipeline::new(
//!         Arc::new(InMemoryDataProvider::new(snapshot)),
//!         Arc::new(InMemoryJobStore::new()),
//!         Arc::new(LocalFileStore::new("./exports")),
//!         PipelineSettings::default(),
//!     );
//!
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     let orchestrator =
//!         ExportOrchestrator::start(Arc::new(pipeline), WorkerSettings::default(), shutdown_rx)?;
//!
//!     let job = orchestrator.create(ExportRequest::new()).await?;
//!     println!("Job {} is {}", job.id, job.status);
//!
//!     orchestrator.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! GA Export uses the [`domain::ExportError`] type for all errors. A failed
//! export is not an error of [`core::export::ExportOrchestrator::create`]: it
//! is recorded on the job, whose `error` field holds the description.
//!
//! ## Logging
//!
//! GA Export uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(job_id = "7d44b88c-4199-4bad-97dc-d78268e01398", "Starting export");
//! warn!(controller_id = "0b9ff7a5-63a4-4a53-8d0e-5b1a5b1d0c11", "No field devices found");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
