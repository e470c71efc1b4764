//! Status command implementation
//!
//! This module implements the `status` command for listing export jobs
//! persisted by the file job store.

use crate::adapters::jobs::{JobStore, JsonFileJobStore};
use crate::config::{load_config, JobStoreKind};
use crate::domain::{Job, JobId, JobStatus};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show a single job
    #[arg(long)]
    pub job_id: Option<String>,

    /// Filter by status (queued, processing, completed, failed)
    #[arg(long)]
    pub status: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        println!("📊 Export Status");
        println!();

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let (job_id, status) = match self.filters() {
            Ok(f) => f,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        if config.jobs.store == JobStoreKind::Memory {
            println!("Job store is in-memory; jobs are not kept between runs.");
            println!("Set [jobs] store = \"file\" to track export history.");
            return Ok(0);
        }

        let store = JsonFileJobStore::new(&config.jobs.path);
        let jobs = match store.list().await {
            Ok(j) => j,
            Err(e) => {
                println!("❌ Failed to load jobs");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if jobs.is_empty() {
            println!("No export history found.");
            println!("Run 'ga-export export' to start exporting data.");
            return Ok(0);
        }

        let filtered = filter_jobs(jobs, job_id.as_ref(), status);
        if filtered.is_empty() {
            println!("No jobs match the specified filters.");
            return Ok(0);
        }

        println!("Found {} job(s):", filtered.len());
        println!();
        println!(
            "{:<38} {:<16} {:<9} {:<7} {:<20} {:<40}",
            "Job ID", "Status", "Progress", "Output", "Updated", "File / Error"
        );
        println!("{}", "-".repeat(134));

        for job in filtered {
            let status = match job.status {
                JobStatus::Completed => "✅ Completed",
                JobStatus::Processing => "🔄 Processing",
                JobStatus::Failed => "❌ Failed",
                JobStatus::Queued => "⏸️  Queued",
            };
            let output = job
                .output_type
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string());
            let detail = job
                .error
                .as_deref()
                .or(job.file_name.as_deref())
                .unwrap_or("-");

            println!(
                "{:<38} {:<16} {:<9} {:<7} {:<20} {:<40}",
                job.id.to_string(),
                status,
                format!("{}%", job.progress),
                output,
                job.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                detail
            );
        }

        println!();
        Ok(0)
    }

    fn filters(&self) -> Result<(Option<JobId>, Option<JobStatus>), String> {
        let job_id = self.job_id.as_deref().map(str::parse).transpose()?;
        let status = self.status.as_deref().map(str::parse).transpose()?;
        Ok((job_id, status))
    }
}

/// Jobs matching the optional id and status filters
fn filter_jobs(jobs: Vec<Job>, job_id: Option<&JobId>, status: Option<JobStatus>) -> Vec<Job> {
    jobs.into_iter()
        .filter(|job| job_id.map_or(true, |id| &job.id == id))
        .filter(|job| status.map_or(true, |s| job.status == s))
        .collect()
}
