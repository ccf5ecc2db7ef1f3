//! CLI command implementations.

pub mod assign;
pub mod config;
pub mod report;

use clap::{Args, Subcommand};

/// Arguments for the assign command.
#[derive(Args)]
pub struct AssignArgs {
    /// Advertisement data file (default: `[store] data_file`).
    #[arg(short, long)]
    pub data: Option<String>,

    /// Only tier this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Show the assignment without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Write the tiered records to this file instead of updating the data file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Advertisement data file (default: `[store] data_file`).
    #[arg(short, long)]
    pub data: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a configuration value.
    Get {
        /// Configuration key (e.g., tiers.n1.quota).
        key: String,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}
