//! Vitrine CLI - batch tiering for the classifieds catalog.
//!
//! Commands:
//! - `vitrine assign` - Assign tiers and derived prices, write them back
//! - `vitrine report` - Show the stored tier distribution per category
//! - `vitrine config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AssignArgs, ConfigArgs, ReportArgs};

/// Vitrine CLI - Assign advertisement tiers per category
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign tiers and derived prices to every category
    Assign(AssignArgs),

    /// Show the tier distribution currently stored
    Report(ReportArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Assign(args) => commands::assign::run(args, &ctx).await,
        Commands::Report(args) => commands::report::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
