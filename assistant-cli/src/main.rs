//! Binary crate for the `assistant` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive chat and configuration
//! - Logging setup (stderr, `RUST_LOG`)

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
