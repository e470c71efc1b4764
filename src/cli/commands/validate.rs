//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the GA Export configuration file.

use crate::config::{load_config, JobStoreKind};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Workers: {}", config.export.workers);
        println!("  Queue Capacity: {}", config.export.queue_capacity);
        println!("  Page Size: {}", config.export.page_size);
        println!(
            "  Single File Device Limit: {}",
            config.export.single_file_device_limit
        );
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Asset Snapshot: {}", config.data.snapshot_path);
        match config.jobs.store {
            JobStoreKind::Memory => println!("  Job Store: memory"),
            JobStoreKind::File => println!("  Job Store: file ({})", config.jobs.path),
        }
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }

        if !Path::new(&config.data.snapshot_path).exists() {
            println!();
            println!(
                "⚠️  Asset snapshot not found: {}",
                config.data.snapshot_path
            );
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/ga-export.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[export]\nworkers = 0\n\n[data]\nsnapshot_path = \"assets.json\"\n"
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(&file.path().to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
