//! Syncro CLI binary.
//!
//! Provides command-line access to the Syncro MSP API:
//! - Show the authenticated user and account settings
//! - List and fetch records of any resource
//! - Inspect the local quota state

use clap::Parser;
use syncro::SyncroConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, execute};

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else {
        "warn,syncro=info"
    };
    syncro::telemetry::init_telemetry(filter, cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => SyncroConfig::from_file(path)?,
        None => SyncroConfig::load()?,
    };

    execute(cli.command, config).await
}
