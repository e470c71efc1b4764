//! Export command implementation
//!
//! This module implements the `export` command: it submits one export
//! request to the orchestrator, follows the job until it finishes and prints
//! where the generated file was written.

use crate::adapters::files::LocalFileStore;
use crate::adapters::jobs::{InMemoryJobStore, JobStore, JsonFileJobStore};
use crate::adapters::provider::{AssetSnapshot, InMemoryDataProvider};
use crate::config::{load_config, GaExportConfig, JobStoreKind, JobsConfig};
use crate::core::export::{ExportOrchestrator, ExportPipeline};
use crate::core::output::Cancellation;
use crate::domain::ids::parse_uuid_list;
use crate::domain::{ExportError, ExportRequest, Job, JobStatus};
use clap::Args;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Project ID(s) to restrict the export to (comma-separated)
    #[arg(long, value_name = "UUIDS")]
    pub project_id: Option<String>,

    /// Building ID(s) to export (comma-separated)
    #[arg(long, value_name = "UUIDS")]
    pub building_id: Option<String>,

    /// Control cabinet ID(s) to export (comma-separated)
    #[arg(long, value_name = "UUIDS")]
    pub cabinet_id: Option<String>,

    /// Controller ID(s) to export (comma-separated)
    #[arg(long, value_name = "UUIDS")]
    pub controller_id: Option<String>,

    /// Hand the job to the worker pool instead of running it inline
    #[arg(long = "async")]
    pub force_async: bool,

    /// Interval between job status polls
    #[arg(long, default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// Cancel the export after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ExportArgs {
    /// Build the export request from the scope flags
    ///
    /// # Errors
    ///
    /// Returns a message naming the first malformed UUID.
    pub fn build_request(&self) -> Result<ExportRequest, String> {
        let ids = |flag: &Option<String>| -> Result<Vec<uuid::Uuid>, String> {
            flag.as_deref().map(parse_uuid_list).unwrap_or(Ok(Vec::new()))
        };

        Ok(ExportRequest::new()
            .with_projects(ids(&self.project_id)?)
            .with_buildings(ids(&self.building_id)?)
            .with_cabinets(ids(&self.cabinet_id)?)
            .with_controllers(ids(&self.controller_id)?)
            .force_async(self.force_async))
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let request = match self.build_request() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Invalid export scope: {e}");
                return Ok(2);
            }
        };

        if !request.has_scope() {
            tracing::info!("No building, cabinet or controller scope given; exporting all controllers");
        }

        // Shutdown signals and the timeout both cancel the running export
        let (cancel_tx, cancel_rx) = watch::channel(*shutdown_signal.borrow());
        let deadline = self.timeout_secs.map(Duration::from_secs);
        let canceller = tokio::spawn(async move {
            let timeout = async {
                match deadline {
                    Some(d) => tokio::time::sleep(d).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::select! {
                _ = signalled(shutdown_signal) => {
                    tracing::warn!("Shutdown requested, cancelling export");
                }
                _ = timeout => {
                    tracing::warn!(timeout_secs = ?deadline.map(|d| d.as_secs()), "Export timed out, cancelling");
                }
            }
            let _ = cancel_tx.send(true);
        });

        let pipeline = match build_pipeline(&config, Cancellation::new(cancel_rx.clone())) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                canceller.abort();
                tracing::error!(error = %e, "Failed to create export pipeline");
                eprintln!("Failed to initialize export: {e}");
                return Ok(5); // Fatal error exit code
            }
        };
        let jobs = Arc::clone(pipeline.jobs());

        let orchestrator = ExportOrchestrator::start(
            pipeline,
            config.export.worker_settings(),
            cancel_rx.clone(),
        )?;

        println!("🚀 Starting export...");
        let started = Instant::now();

        let job = match orchestrator.create(request).await {
            Ok(job) => job,
            Err(e) => {
                canceller.abort();
                orchestrator.shutdown().await;
                tracing::error!(error = %e, "Failed to submit export");
                eprintln!("Failed to submit export: {e}");
                return Ok(5);
            }
        };
        println!("  Job: {} ({})", job.id, job.status);

        let job_id = job.id.clone();
        if let Err(e) = self.follow(&orchestrator, job, &cancel_rx).await {
            tracing::error!(job_id = %job_id, error = %e, "Failed to poll export job");
        }

        orchestrator.shutdown().await;
        canceller.abort();

        // The pool may have failed a job it never started during shutdown
        let job = match jobs.get(&job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                eprintln!("Export job {job_id} is missing from the job store");
                return Ok(5);
            }
            Err(e) => {
                eprintln!("Failed to read export job {job_id}: {e}");
                return Ok(5);
            }
        };

        println!();
        println!("📊 Export Summary:");
        println!("  Job: {}", job.id);
        println!("  Status: {}", job.status);
        println!("  Progress: {}%", job.progress);
        println!("  Duration: {:.2}s", started.elapsed().as_secs_f64());

        let exit_code = match job.status {
            JobStatus::Completed => {
                if let Some(output_type) = job.output_type {
                    println!("  Output: {output_type}");
                }
                if let Some(path) = &job.file_path {
                    println!("  File: {path}");
                }
                println!();
                println!("✅ Export completed successfully!");
                0
            }
            JobStatus::Failed => {
                println!("  Error: {}", job.error.as_deref().unwrap_or("unknown"));
                println!();
                println!("❌ Export failed");
                1
            }
            JobStatus::Queued | JobStatus::Processing => {
                println!();
                println!("⚠️  Export did not finish (last phase: {})", job.message);
                5
            }
        };

        Ok(exit_code)
    }

    /// Poll the job until it is terminal or the export is cancelled
    async fn follow(
        &self,
        orchestrator: &ExportOrchestrator,
        mut job: Job,
        cancel: &watch::Receiver<bool>,
    ) -> crate::domain::Result<Job> {
        let interval = Duration::from_millis(self.poll_interval_ms.max(10));
        let mut last_progress = job.progress;

        while !job.is_terminal() {
            // Queued jobs are failed by the pool shutdown once cancelled
            if *cancel.borrow() && job.status == JobStatus::Queued {
                break;
            }

            tokio::time::sleep(interval).await;
            job = orchestrator
                .get(&job.id)
                .await?
                .ok_or_else(|| ExportError::JobNotFound(job.id.clone()))?;

            if job.progress != last_progress {
                println!("  {:>3}% {}", job.progress, job.message);
                last_progress = job.progress;
            }
        }

        Ok(job)
    }
}

/// Wire the bundled adapters into a pipeline
///
/// # Errors
///
/// Returns [`ExportError::DataProvider`] if the asset snapshot cannot be loaded.
pub fn build_pipeline(
    config: &GaExportConfig,
    cancellation: Cancellation,
) -> crate::domain::Result<ExportPipeline> {
    let snapshot = AssetSnapshot::from_file(&config.data.snapshot_path)?;
    tracing::info!(
        snapshot = %config.data.snapshot_path,
        controllers = snapshot.sps_controllers.len(),
        field_devices = snapshot.field_devices.len(),
        "Asset snapshot loaded"
    );

    let provider = Arc::new(InMemoryDataProvider::new(snapshot));
    let files = Arc::new(LocalFileStore::new(&config.export.output_dir));

    Ok(ExportPipeline::new(
        provider,
        job_store(&config.jobs),
        files,
        config.export.pipeline_settings(),
    )
    .with_cancellation(cancellation))
}

/// Job store selected by configuration
pub fn job_store(config: &JobsConfig) -> Arc<dyn JobStore + Send + Sync> {
    match config.store {
        JobStoreKind::Memory => Arc::new(InMemoryJobStore::new()),
        JobStoreKind::File => Arc::new(JsonFileJobStore::new(&config.path)),
    }
}

async fn signalled(mut signal: watch::Receiver<bool>) {
    if signal.wait_for(|stop| *stop).await.is_err() {
        // Sender gone: the signal can no longer fire
        std::future::pending::<()>().await;
    }
}
