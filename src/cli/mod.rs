//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for GA Export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// GA Export - building automation data point exporter
#[derive(Parser, Debug)]
#[command(name = "ga-export")]
#[command(version, about, long_about = None)]
#[command(author = "GA Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ga-export.toml", env = "GA_EXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GA_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export controller data points to a workbook or zip archive
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List persisted export jobs
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
