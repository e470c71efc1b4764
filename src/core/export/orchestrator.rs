//! Export orchestrator
//!
//! Accepts export requests and drives them through the pipeline, either on
//! the caller's task or on a fixed pool of workers draining one bounded FIFO
//! queue of job ids.
//!
//! # Inline vs queued execution
//!
//! A request runs inline when `force_async` is false and the queue looks
//! empty. The emptiness check and the enqueue are not atomic, so under
//! concurrent submissions a request may be queued even though the queue was
//! empty a moment earlier. Inline execution is best-effort; callers must poll
//! the job by id rather than rely on `create` returning a terminal job.

use super::pipeline::ExportPipeline;
use crate::core::output::Cancellation;
use crate::domain::{ExportError, ExportRequest, Job, JobId, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

type JobQueue = Arc<Mutex<mpsc::Receiver<JobId>>>;

/// Worker pool dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Number of independent workers
    pub workers: usize,

    /// Capacity of the pending-job queue
    pub queue_capacity: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            workers: 1,
            queue_capacity: 100,
        }
    }
}

/// Job lifecycle front end and worker pool
pub struct ExportOrchestrator {
    pipeline: Arc<ExportPipeline>,
    sender: mpsc::Sender<JobId>,
    queue: JobQueue,
    workers: Vec<JoinHandle<()>>,
    cancellation: Cancellation,
}

impl ExportOrchestrator {
    /// Spawn the worker pool
    ///
    /// Workers stop once `shutdown` turns `true` or the orchestrator is shut
    /// down. The same signal cancels jobs in flight, whether they run on a
    /// worker or inline in [`create`](Self::create), on top of any
    /// cancellation the pipeline already carries. Must be called from within
    /// a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Validation`] for a zero worker count or queue
    /// capacity.
    pub fn start(
        pipeline: Arc<ExportPipeline>,
        settings: WorkerSettings,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        if settings.workers == 0 {
            return Err(ExportError::Validation(
                "at least one export worker is required".to_string(),
            ));
        }
        if settings.queue_capacity == 0 {
            return Err(ExportError::Validation(
                "export queue capacity must be at least 1".to_string(),
            ));
        }

        let (sender, receiver) = mpsc::channel(settings.queue_capacity);
        let queue: JobQueue = Arc::new(Mutex::new(receiver));
        let cancellation = Cancellation::new(shutdown.clone());

        let workers = (0..settings.workers)
            .map(|worker| {
                tokio::spawn(worker_loop(
                    worker,
                    Arc::clone(&pipeline),
                    Arc::clone(&queue),
                    shutdown.clone(),
                    cancellation.clone(),
                ))
            })
            .collect();

        tracing::info!(
            workers = settings.workers,
            queue_capacity = settings.queue_capacity,
            "Export worker pool started"
        );

        Ok(Self {
            pipeline,
            sender,
            queue,
            workers,
            cancellation,
        })
    }

    /// Submit an export request
    ///
    /// The job is persisted as `queued` first. It then either runs inline and
    /// is returned in its terminal state, or is handed to the worker pool and
    /// returned as `queued`. A job the queue cannot accept is returned as
    /// `failed` without blocking the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the job cannot be persisted.
    pub async fn create(&self, request: ExportRequest) -> Result<Job> {
        let force_async = request.force_async;
        let job = self.pipeline.register(request).await?;

        if force_async || self.queue_len() > 0 {
            return self.enqueue(job).await;
        }

        tracing::debug!(job_id = %job.id, "Running export inline");
        run_guarded(&self.pipeline, &job.id, &self.cancellation).await
    }

    /// Load a job record
    pub async fn get(&self, job_id: &JobId) -> Result<Option<Job>> {
        self.pipeline.jobs().get(job_id).await
    }

    /// Number of job ids waiting for a worker
    pub fn queue_len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    /// The pipeline jobs run through
    pub fn pipeline(&self) -> &Arc<ExportPipeline> {
        &self.pipeline
    }

    /// Stop accepting work and wait for the workers to exit
    ///
    /// Without a shutdown signal the workers first drain the queue. Jobs still
    /// queued after the workers stopped are failed so no record stays
    /// `queued` forever.
    pub async fn shutdown(self) {
        let Self {
            pipeline,
            sender,
            queue,
            workers,
            ..
        } = self;
        drop(sender);

        for (worker, handle) in workers.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!(worker, error = %e, "Export worker terminated abnormally");
            }
        }

        let mut queue = queue.lock().await;
        let reason = ExportError::Cancelled("export service shut down before the job started".to_string());
        while let Ok(job_id) = queue.try_recv() {
            if let Err(e) = pipeline.abandon(&job_id, &reason).await {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record abandoned job");
            }
        }

        tracing::info!("Export worker pool stopped");
    }

    async fn enqueue(&self, job: Job) -> Result<Job> {
        let job_id = job.id.clone();
        let rejection = match self.sender.try_send(job_id.clone()) {
            Ok(()) => {
                tracing::debug!(job_id = %job_id, queued = self.queue_len(), "Export job queued");
                return Ok(job);
            }
            Err(TrySendError::Full(_)) => format!(
                "export queue is full ({} jobs waiting)",
                self.sender.max_capacity()
            ),
            Err(TrySendError::Closed(_)) => "export worker pool has stopped".to_string(),
        };

        tracing::warn!(job_id = %job_id, reason = %rejection, "Export job rejected");
        self.pipeline
            .abandon(&job_id, &ExportError::Other(rejection))
            .await
    }
}

/// Drain the queue until it closes or shutdown is signalled
async fn worker_loop(
    worker: usize,
    pipeline: Arc<ExportPipeline>,
    queue: JobQueue,
    mut shutdown: watch::Receiver<bool>,
    cancellation: Cancellation,
) {
    tracing::debug!(worker, "Export worker started");

    loop {
        let next = tokio::select! {
            biased;
            _ = wait_for_shutdown(&mut shutdown) => None,
            job_id = async { queue.lock().await.recv().await } => job_id,
        };
        let Some(job_id) = next else {
            break;
        };

        tracing::debug!(worker, job_id = %job_id, "Export job dequeued");
        match run_guarded(&pipeline, &job_id, &cancellation).await {
            Ok(job) => tracing::debug!(
                worker,
                job_id = %job_id,
                status = %job.status,
                "Export job finished"
            ),
            Err(e) => tracing::error!(
                worker,
                job_id = %job_id,
                error = %e,
                "Failed to record export job outcome"
            ),
        }
    }

    tracing::debug!(worker, "Export worker stopped");
}

/// Run the pipeline, turning a panic into a failed job
async fn run_guarded(
    pipeline: &ExportPipeline,
    job_id: &JobId,
    cancellation: &Cancellation,
) -> Result<Job> {
    match AssertUnwindSafe(pipeline.process_cancellable(job_id, cancellation))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => {
            let error = ExportError::Other(format!(
                "export worker panicked: {}",
                panic_message(panic.as_ref())
            ));
            pipeline.abandon(job_id, &error).await
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            // Sender gone: shutdown can no longer be signalled
            std::future::pending::<()>().await;
        }
    }
}
