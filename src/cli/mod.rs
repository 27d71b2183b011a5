//! Command-line interface.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{bootstrap, resolve, status, sync, watch};

/// Flow identifier discovery and propagation for the TravelMate
/// chatbot stack.
#[derive(Parser, Debug)]
#[command(name = "flowsync", version, about)]
pub struct Cli {
    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .flowsync/
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait for services, then run a full sync pass
    Sync(sync::SyncArgs),
    /// Discover or create the flow and persist its identifier
    Bootstrap(bootstrap::BootstrapArgs),
    /// Watch the persisted identifier and re-propagate on change
    Watch(watch::WatchArgs),
    /// Show the persisted identifier and the latest sync status
    Status(status::StatusArgs),
    /// Resolve the identifier once and print it
    Resolve(resolve::ResolveArgs),
}

/// Report a fatal error and terminate with a failing exit code.
///
/// Reserved for readiness exhaustion and total resolution failure.
/// Partial propagation or verification problems never come through
/// here; those runs exit cleanly with a degraded summary.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let payload = serde_json::json!({
            "status": "error",
            "error": err.to_string(),
        });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
