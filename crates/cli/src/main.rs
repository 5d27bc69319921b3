//! MeshInvite CLI - Main Entry Point
//!
//! Issues tinc invitations for display names and reports mesh status.

use clap::{Parser, Subcommand};
use meshinvite_common::Config;
use std::path::PathBuf;

mod client;
mod commands;
mod output;

use commands::{invite, status};

/// MeshInvite CLI - tinc invite issuance and node status
#[derive(Parser)]
#[command(name = "meshinvite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "MESHINVITE_CONFIG", default_value_os_t = meshinvite_common::default_config_path())]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Invite(invite::InviteCommands),

    #[command(flatten)]
    Status(status::StatusCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&cli.config)?;
    let manager = client::connect(&config);

    match cli.command {
        Commands::Invite(cmd) => invite::execute(cmd, &manager, cli.format).await?,
        Commands::Status(cmd) => {
            status::execute(cmd, &manager, config.status.refresh_secs, cli.format).await?
        }
        Commands::Version => {
            println!("MeshInvite CLI v{}", meshinvite_common::VERSION);
            println!("tinc binary: {}", config.tinc.bin);
        }
    }

    Ok(())
}
