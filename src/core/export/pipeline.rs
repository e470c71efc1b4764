//! Export pipeline
//!
//! Runs one job through its phases: resolve controllers, collect field
//! devices page by page, pick the output type, render the file and finalize
//! the job record. Every failure ends the job as `failed` with the error text
//! preserved; nothing is retried.

use super::requests::PendingRequests;
use crate::adapters::files::FileStore;
use crate::adapters::jobs::JobStore;
use crate::adapters::provider::DataProvider;
use crate::core::output::{
    Cancellation, DeviceMap, OutputGenerator, WorkbookGenerator, ZipArchiveGenerator,
};
use crate::domain::job::{MSG_COLLECTING, MSG_GENERATING, MSG_QUEUED, MSG_RESOLVING};
use crate::domain::{
    Controller, ExportError, ExportRequest, Job, JobId, OutputType, Result,
};
use crate::{log_job_complete, log_job_failed, log_job_phase};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Progress reported once controllers are being resolved
pub const PROGRESS_RESOLVING: u8 = 5;
/// Progress share spent collecting field devices
pub const PROGRESS_COLLECTING_SPAN: usize = 55;
/// Progress reported while the output file is rendered
pub const PROGRESS_GENERATING: u8 = 75;

/// Tunables of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Field devices requested per page
    pub page_size: usize,

    /// Largest device count rendered as a single workbook
    pub single_file_device_limit: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            page_size: 1000,
            single_file_device_limit: 5000,
        }
    }
}

/// Progress after `completed` of `total` controllers have been collected
///
/// ```
/// use ga_export::core::export::pipeline::collection_progress;
///
/// assert_eq!(collection_progress(1, 1), 60);
/// assert_eq!(collection_progress(1, 2), 32);
/// ```
pub fn collection_progress(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return PROGRESS_RESOLVING;
    }
    let span = completed.min(total) * PROGRESS_COLLECTING_SPAN / total;
    PROGRESS_RESOLVING + span as u8
}

/// Job pipeline and its collaborators
pub struct ExportPipeline {
    provider: Arc<dyn DataProvider + Send + Sync>,
    jobs: Arc<dyn JobStore + Send + Sync>,
    files: Arc<dyn FileStore + Send + Sync>,
    generators: HashMap<OutputType, Arc<dyn OutputGenerator + Send + Sync>>,
    requests: PendingRequests,
    settings: PipelineSettings,
    cancellation: Cancellation,
}

impl ExportPipeline {
    /// Create a pipeline with the bundled workbook and archive generators
    pub fn new(
        provider: Arc<dyn DataProvider + Send + Sync>,
        jobs: Arc<dyn JobStore + Send + Sync>,
        files: Arc<dyn FileStore + Send + Sync>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            provider,
            jobs,
            files,
            generators: HashMap::new(),
            requests: PendingRequests::new(),
            settings,
            cancellation: Cancellation::never(),
        }
        .with_generator(Arc::new(WorkbookGenerator::new()))
        .with_generator(Arc::new(ZipArchiveGenerator::new()))
    }

    /// Register a generator, replacing the one for the same output type
    pub fn with_generator(mut self, generator: Arc<dyn OutputGenerator + Send + Sync>) -> Self {
        self.generators.insert(generator.output_type(), generator);
        self
    }

    /// Signal checked between controllers, sheets and cabinet groups
    ///
    /// The orchestrator adds its own shutdown signal on top of this one.
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Job store backing this pipeline
    pub fn jobs(&self) -> &Arc<dyn JobStore + Send + Sync> {
        &self.jobs
    }

    /// Payloads of jobs that have not reached a terminal state
    pub fn pending(&self) -> &PendingRequests {
        &self.requests
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Persist a new queued job and keep its request payload
    ///
    /// # Errors
    ///
    /// Returns the job store error; no payload is kept in that case.
    pub async fn register(&self, request: ExportRequest) -> Result<Job> {
        let job = Job::queued(JobId::new());
        self.jobs.create(&job).await?;
        self.requests.insert(job.id.clone(), request);
        log_job_phase!(job.id, job.progress, MSG_QUEUED);
        Ok(job)
    }

    /// Run a job to a terminal state
    ///
    /// Processing failures are recorded on the job and do not surface here.
    /// The request payload is discarded on every path, including errors.
    ///
    /// # Returns
    ///
    /// The job as last persisted.
    ///
    /// # Errors
    ///
    /// Returns an error only when the job could not be loaded or its outcome
    /// could not be recorded, e.g. the job store rejected the final update.
    pub async fn process(&self, job_id: &JobId) -> Result<Job> {
        self.process_cancellable(job_id, &Cancellation::never()).await
    }

    /// Like [`process`](Self::process), additionally stopping once `extra`
    /// fires
    pub async fn process_cancellable(&self, job_id: &JobId, extra: &Cancellation) -> Result<Job> {
        // Taken up front so no exit path leaves the payload behind
        let request = self.requests.remove(job_id);
        let mut job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| ExportError::JobNotFound(job_id.clone()))?;

        if job.is_terminal() {
            tracing::warn!(job_id = %job_id, status = %job.status, "Skipping finished job");
            return Ok(job);
        }

        let cancellation = self.cancellation.clone().or(extra.clone());
        let started = Instant::now();
        let outcome = self.run(&mut job, request, &cancellation).await;

        match outcome {
            Ok(devices) => {
                log_job_complete!(job_id, devices, started.elapsed());
                Ok(job)
            }
            Err(error) => {
                self.record_failure(&mut job, &error).await?;
                Ok(job)
            }
        }
    }

    /// Fail a job that will never be processed
    ///
    /// Used when the job cannot be queued or its worker crashed. A job that
    /// already reached a terminal state is returned unchanged.
    pub async fn abandon(&self, job_id: &JobId, error: &ExportError) -> Result<Job> {
        self.requests.remove(job_id);
        let mut job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| ExportError::JobNotFound(job_id.clone()))?;

        if !job.is_terminal() {
            self.record_failure(&mut job, error).await?;
        }
        Ok(job)
    }

    async fn record_failure(&self, job: &mut Job, error: &ExportError) -> Result<()> {
        log_job_failed!(job.id, error);
        job.fail(error.to_string())?;
        self.jobs.update(job).await
    }

    /// Phases 2-7; returns the device count of the export
    async fn run(
        &self,
        job: &mut Job,
        request: Option<ExportRequest>,
        cancellation: &Cancellation,
    ) -> Result<usize> {
        let request = request.ok_or_else(|| ExportError::MissingRequest(job.id.clone()))?;

        job.start_processing(PROGRESS_RESOLVING, MSG_RESOLVING)?;
        self.jobs.update(job).await?;
        log_job_phase!(job.id, job.progress, MSG_RESOLVING);

        let controllers = self.provider.resolve_controllers(&request).await?;
        tracing::debug!(job_id = %job.id, controllers = controllers.len(), "Controllers resolved");

        let (devices, total) = self
            .collect_devices(job, &request, &controllers, cancellation)
            .await?;

        let output_type =
            OutputType::for_device_count(total, self.settings.single_file_device_limit);
        let (path, file_name) = self.files.build_output_path(&job.id, output_type);
        job.assign_output(output_type, file_name, path.to_string_lossy())?;
        job.report_progress(PROGRESS_GENERATING, MSG_GENERATING)?;
        self.jobs.update(job).await?;
        log_job_phase!(job.id, job.progress, MSG_GENERATING);
        tracing::info!(
            job_id = %job.id,
            output_type = %output_type,
            devices = total,
            path = %path.display(),
            "Generating export file"
        );

        self.generate(output_type, path, controllers, devices, cancellation).await?;

        // Keep `job` non-terminal until the completion is persisted
        let mut completed = job.clone();
        completed.complete()?;
        self.jobs.update(&completed).await?;
        *job = completed;

        Ok(total)
    }

    async fn collect_devices(
        &self,
        job: &mut Job,
        request: &ExportRequest,
        controllers: &[Controller],
        cancellation: &Cancellation,
    ) -> Result<(DeviceMap, usize)> {
        let page_size = self.settings.page_size.max(1);
        let mut devices = DeviceMap::with_capacity(controllers.len());
        let mut total = 0usize;

        for (index, controller) in controllers.iter().enumerate() {
            cancellation.check()?;

            let mut collected = Vec::new();
            let mut page = 1;
            loop {
                let batch = self
                    .provider
                    .list_field_devices_by_controller(&controller.id, request, page, page_size)
                    .await?;
                if page == 1 {
                    total += batch.total;
                }
                let fetched = batch.items.len();
                collected.extend(batch.items);
                if fetched < page_size {
                    break;
                }
                page += 1;
            }

            tracing::debug!(
                job_id = %job.id,
                controller_id = %controller.id,
                devices = collected.len(),
                pages = page,
                "Field devices collected"
            );
            devices.insert(controller.id, collected);

            job.report_progress(
                collection_progress(index + 1, controllers.len()),
                MSG_COLLECTING,
            )?;
            self.jobs.update(job).await?;
        }

        Ok((devices, total))
    }

    async fn generate(
        &self,
        output_type: OutputType,
        path: PathBuf,
        controllers: Vec<Controller>,
        devices: DeviceMap,
        cancellation: &Cancellation,
    ) -> Result<()> {
        let generator = self.generators.get(&output_type).cloned().ok_or_else(|| {
            ExportError::Generation(format!("no generator registered for {output_type} output"))
        })?;

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                ExportError::Generation(format!(
                    "failed to create output directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let cancellation = cancellation.clone();
        tokio::task::spawn_blocking(move || {
            generator.generate(&path, &controllers, &devices, &cancellation)
        })
        .await
        .map_err(|e| ExportError::Generation(format!("generator task failed: {e}")))?
    }
}
