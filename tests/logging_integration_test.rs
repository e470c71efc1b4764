//! Integration tests for logging functionality
//!
//! The global subscriber can be installed once per process, so only one test
//! in this binary calls `init_logging` with a valid level. The default filter
//! only admits this crate's own events, so the test drives the pipeline to
//! produce them.

use ga_export::adapters::files::LocalFileStore;
use ga_export::adapters::jobs::{InMemoryJobStore, JobStore};
use ga_export::adapters::provider::{AssetSnapshot, InMemoryDataProvider};
use ga_export::config::LoggingConfig;
use ga_export::core::export::{ExportPipeline, PipelineSettings};
use ga_export::domain::{ExportError, ExportRequest, Job, JobId};
use ga_export::logging::init_logging;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "/var/log/ga-export");
}

#[test]
fn test_invalid_level_is_configuration_error() {
    let result = init_logging("loud", &LoggingConfig::default());
    assert!(matches!(result, Err(ExportError::Configuration(_))));
}

#[tokio::test]
async fn test_file_logging_writes_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    let jobs = Arc::new(InMemoryJobStore::new());
    let pipeline = ExportPipeline::new(
        Arc::new(InMemoryDataProvider::new(AssetSnapshot::default())),
        jobs.clone(),
        Arc::new(LocalFileStore::new(temp_dir.path().join("exports"))),
        PipelineSettings::default(),
    );

    let queued = pipeline.register(ExportRequest::new()).await.unwrap();

    // No payload was registered for this one
    let orphan = Job::queued(JobId::new());
    jobs.create(&orphan).await.unwrap();
    pipeline.process(&orphan.id).await.unwrap();

    // Dropping the guard flushes the non-blocking writer
    drop(guard);

    let contents: String = std::fs::read_dir(&log_path)
        .unwrap()
        .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect();
    let lines_for = |job_id: &JobId| -> Vec<serde_json::Value> {
        contents
            .lines()
            .filter(|line| line.contains(&job_id.to_string()))
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    };

    let queued_lines = lines_for(&queued.id);
    assert_eq!(queued_lines.len(), 1, "log contents: {contents}");
    assert_eq!(queued_lines[0]["fields"]["phase"], "queued");
    assert_eq!(queued_lines[0]["fields"]["progress"], 0);

    let failed_lines = lines_for(&orphan.id);
    assert_eq!(failed_lines.len(), 1, "log contents: {contents}");
    assert_eq!(failed_lines[0]["level"], "ERROR");
    assert!(failed_lines[0]["fields"]["error"]
        .as_str()
        .unwrap()
        .contains("No request payload"));
}
