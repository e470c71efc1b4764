//! Configuration management for GA Export.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! GA Export uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GA_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ga_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ga-export.toml")?;
//!
//! println!("Workers: {}", config.export.workers);
//! println!("Output directory: {}", config.export.output_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ExportConfig`] - Worker pool, queue, paging and output settings
//! - [`DataConfig`] - Asset snapshot location
//! - [`JobsConfig`] - Job record backend
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! workers = 2
//! queue_capacity = 100
//! page_size = 1000
//! single_file_device_limit = 5000
//! output_dir = "./exports"
//!
//! [data]
//! snapshot_path = "${GA_EXPORT_SNAPSHOT}"
//!
//! [jobs]
//! store = "file"
//! path = "./exports/jobs"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DataConfig, ExportConfig, GaExportConfig, JobStoreKind, JobsConfig,
    LoggingConfig,
};
