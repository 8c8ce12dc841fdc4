//! # Barscan Station Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Barscan Station                                  │
//! │                                                                         │
//! │  main.rs ────► Parses the command line, sets up logging                │
//! │                                                                         │
//! │  lib.rs ─────► Loads config, builds state, dispatches                  │
//! │                                                                         │
//! │  commands/ ──► scan, export_csv, clear_results, checkin, lookup        │
//! │                                                                         │
//! │  state/ ─────► ResultsState, ConfigState, DeviceState                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//! ```text
//! barscan scan --source ./frames --duration 30 --export
//! barscan scan --source ./frames --export --clear
//! barscan checkin --source ./frames --timeout 20
//! barscan lookup KH-0042
//! barscan --config ./barscan.toml config
//! ```

use anyhow::Context;
use clap::Parser;

use barscan_app::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The actual setup is in lib.rs for better testability
    barscan_app::init_tracing();

    barscan_app::run(cli).await.context("barscan failed")
}
