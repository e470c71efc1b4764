//! Configuration schema types
//!
//! This module defines the configuration structure for GA Export.

use crate::core::export::{PipelineSettings, WorkerSettings};
use serde::{Deserialize, Serialize};

/// Job record backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStoreKind {
    /// Records live in process memory
    #[default]
    Memory,
    /// One JSON document per job on disk
    File,
}

impl std::fmt::Display for JobStoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStoreKind::Memory => f.write_str("memory"),
            JobStoreKind::File => f.write_str("file"),
        }
    }
}

/// Main GA Export configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GaExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export pipeline and worker pool settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Asset data source
    pub data: DataConfig,

    /// Job record persistence
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GaExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.data.validate()?;
        self.jobs.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Export pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Number of workers draining the job queue
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Capacity of the pending-job queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Field devices fetched per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Largest device count exported as a single workbook
    #[serde(default = "default_single_file_device_limit")]
    pub single_file_device_limit: usize,

    /// Directory receiving generated files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.workers == 0 || self.workers > 64 {
            return Err(format!(
                "export.workers must be between 1 and 64, got {}",
                self.workers
            ));
        }

        if self.queue_capacity == 0 || self.queue_capacity > 10_000 {
            return Err(format!(
                "export.queue_capacity must be between 1 and 10000, got {}",
                self.queue_capacity
            ));
        }

        if self.page_size == 0 || self.page_size > 10_000 {
            return Err(format!(
                "export.page_size must be between 1 and 10000, got {}",
                self.page_size
            ));
        }

        if self.single_file_device_limit == 0 {
            return Err("export.single_file_device_limit must be at least 1".to_string());
        }

        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        Ok(())
    }

    /// Pipeline settings derived from this section
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            page_size: self.page_size,
            single_file_device_limit: self.single_file_device_limit,
        }
    }

    /// Worker pool settings derived from this section
    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            page_size: default_page_size(),
            single_file_device_limit: default_single_file_device_limit(),
            output_dir: default_output_dir(),
        }
    }
}

/// Asset data source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON asset snapshot served by the bundled data provider
    pub snapshot_path: String,
}

impl DataConfig {
    fn validate(&self) -> Result<(), String> {
        if self.snapshot_path.trim().is_empty() {
            return Err("data.snapshot_path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Job record persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Backend holding job records
    #[serde(default)]
    pub store: JobStoreKind,

    /// Directory of the file backend
    #[serde(default = "default_jobs_path")]
    pub path: String,
}

impl JobsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.store == JobStoreKind::File && self.path.trim().is_empty() {
            return Err("jobs.path is required when jobs.store = 'file'".to_string());
        }
        Ok(())
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            store: JobStoreKind::default(),
            path: default_jobs_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_workers() -> usize {
    1
}

fn default_queue_capacity() -> usize {
    100
}

fn default_page_size() -> usize {
    1000
}

fn default_single_file_device_limit() -> usize {
    5000
}

fn default_output_dir() -> String {
    "./exports".to_string()
}

fn default_jobs_path() -> String {
    "./exports/jobs".to_string()
}

fn default_local_path() -> String {
    "/var/log/ga-export".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GaExportConfig {
        GaExportConfig {
            data: DataConfig {
                snapshot_path: "assets.json".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_defaults() {
        let export = ExportConfig::default();
        assert_eq!(export.workers, 1);
        assert_eq!(export.queue_capacity, 100);
        assert_eq!(export.page_size, 1000);
        assert_eq!(export.single_file_device_limit, 5000);
        assert_eq!(export.output_dir, "./exports");
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_export_config_bounds() {
        let mut export = ExportConfig::default();
        export.workers = 0;
        assert!(export.validate().is_err());
        export.workers = 65;
        assert!(export.validate().is_err());
        export.workers = 64;
        assert!(export.validate().is_ok());

        export.queue_capacity = 10_001;
        assert!(export.validate().is_err());
        export.queue_capacity = 1;

        export.page_size = 0;
        assert!(export.validate().is_err());
        export.page_size = 10;

        export.single_file_device_limit = 0;
        assert!(export.validate().is_err());
    }

    #[test]
    fn test_settings_conversion() {
        let export = ExportConfig {
            workers: 4,
            queue_capacity: 8,
            page_size: 250,
            single_file_device_limit: 100,
            ..Default::default()
        };
        assert_eq!(
            export.worker_settings(),
            WorkerSettings {
                workers: 4,
                queue_capacity: 8
            }
        );
        assert_eq!(
            export.pipeline_settings(),
            PipelineSettings {
                page_size: 250,
                single_file_device_limit: 100
            }
        );
    }

    #[test]
    fn test_snapshot_path_required() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.data.snapshot_path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jobs_config() {
        let mut jobs = JobsConfig::default();
        assert_eq!(jobs.store, JobStoreKind::Memory);
        assert!(jobs.validate().is_ok());

        jobs.store = JobStoreKind::File;
        jobs.path = String::new();
        assert!(jobs.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut logging = LoggingConfig::default();
        assert!(logging.validate().is_ok());

        logging.local_rotation = "size".to_string();
        assert!(logging.validate().is_err());
    }

    #[test]
    fn test_minimal_toml() {
        let config: GaExportConfig = toml::from_str(
            r#"
[data]
snapshot_path = "assets.json"

[jobs]
store = "file"
"#,
        )
        .unwrap();

        assert_eq!(config.jobs.store, JobStoreKind::File);
        assert_eq!(config.jobs.path, "./exports/jobs");
        assert_eq!(config.export.workers, 1);
        assert!(config.validate().is_ok());
    }
}
