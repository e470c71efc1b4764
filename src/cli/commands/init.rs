//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ga-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing GA Export configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [data] snapshot_path at your asset snapshot JSON");
                println!("  2. Adjust [export] workers and output_dir if needed");
                println!("  3. Validate configuration: ga-export validate-config");
                println!("  4. Run export: ga-export export --cabinet-id <UUID>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Starter configuration with every option and its default
    fn generate_config() -> String {
        r#"# GA Export Configuration File
# Exports building automation data points to Excel workbooks

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Workers draining the job queue (1-64)
workers = 1

# Jobs that may wait for a worker (1-10000)
queue_capacity = 100

# Field devices fetched per page (1-10000)
page_size = 1000

# Exports with more field devices are split into one workbook per
# control cabinet and delivered as a zip archive
single_file_device_limit = 5000

# Directory receiving generated files
output_dir = "./exports"

# ============================================================================
# Asset Data
# ============================================================================
[data]
# JSON snapshot of projects, buildings, cabinets, controllers and devices
# Environment variables are substituted: snapshot_path = "${GA_EXPORT_SNAPSHOT}"
snapshot_path = "./assets.json"

# ============================================================================
# Job Records
# ============================================================================
[jobs]
# memory: jobs are lost on exit; file: one JSON document per job
store = "file"
path = "./exports/jobs"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "/var/log/ga-export"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
