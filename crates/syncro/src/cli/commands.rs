//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use syncro::ResourceKind;

/// Syncro - command-line access to the Syncro MSP API
#[derive(Parser, Debug)]
#[command(name = "syncro")]
#[command(about = "Command-line access to the Syncro MSP API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Read settings from this file instead of the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the user owning the API key
    Me,

    /// Show account settings
    Settings,

    /// List records of a resource
    List {
        /// Resource name (e.g. customers, tickets, customer_assets)
        resource: ResourceKind,

        /// Page to fetch (1-indexed)
        #[arg(long)]
        page: Option<u32>,

        /// Records per page
        #[arg(long)]
        per_page: Option<u32>,

        /// Fetch every page
        #[arg(long, conflicts_with = "page")]
        all: bool,

        /// Extra query parameter as key=value (repeatable)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Fetch one record by id
    Get {
        /// Resource name
        resource: ResourceKind,

        /// Record id
        id: u64,
    },

    /// Show the local quota state
    Quota,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}
