//! # Barscan Station Library
//!
//! Core library for the barscan command line station.
//! This is the entry point that loads configuration, builds state and
//! dispatches commands.
//!
//! ## Module Organization
//! ```text
//! barscan_app/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap command line
//! ├── config.rs       ◄─── barscan.toml + BARSCAN_* overrides
//! ├── notifier.rs     ◄─── Toast delivery (terminal, recording)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── results.rs  ◄─── Result list (Arc<Mutex<ResultStore>>)
//! │   ├── config.rs   ◄─── Effective configuration
//! │   └── devices.rs  ◄─── Camera backend + decoder factory
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── scan.rs     ◄─── Streaming scan
//! │   ├── results.rs  ◄─── List / statistics / clear
//! │   ├── export.rs   ◄─── CSV export
//! │   └── lookup.rs   ◄─── Customer lookup & check-in
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notifier;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::AppConfig;
use error::{ApiError, ErrorCode};
use notifier::{Notifier, TerminalNotifier};
use state::{ConfigState, DeviceState, ResultsState};

/// Runs one command line invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config <path> or the platform config dir                        │
/// │     • BARSCAN_* environment overrides, then validation                  │
/// │                                                                         │
/// │  2. Initialize State Objects ─────────────────────────────────────────► │
/// │     • ConfigState: effective configuration                              │
/// │     • ResultsState: empty result list                                   │
/// │     • DeviceState: image-directory camera + rxing decoder               │
/// │                                                                         │
/// │  3. Dispatch Command ─────────────────────────────────────────────────► │
/// │     • Notices go to the terminal in the configured locale               │
/// │     • Output is printed as text or JSON (--json)                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    let config = ConfigState::new(AppConfig::load(cli.config.clone())?);

    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier::new(config.locale()));
    let json = cli.json;

    match cli.command {
        Command::Scan {
            source,
            duration,
            export,
            clear,
        } => {
            let devices = DeviceState::image_dir(source);
            let duration = duration.map(Duration::from_secs);
            let after = AfterScan { export, clear };
            run_scan(&config, devices, notifier, duration, after, json).await
        }
        Command::Checkin { source, timeout } => {
            let directory = commands::lookup::customer_client(&config)?;
            let report = commands::lookup::checkin(
                &config,
                &DeviceState::image_dir(source),
                &directory,
                notifier,
                Duration::from_secs(timeout),
            )
            .await?;

            print(json, &report, || {
                println!("{}\t{}", report.code, report.customer.name);
            })
        }
        Command::Lookup { code } => {
            let directory = commands::lookup::customer_client(&config)?;
            let customer =
                commands::lookup::lookup_customer(&directory, notifier.as_ref(), &code).await?;

            print(json, &customer, || println!("{}", customer.name))
        }
        Command::Config => {
            if json {
                print(true, config.config(), || {})
            } else {
                print!("{}", config.config().to_toml()?);
                Ok(())
            }
        }
    }
}

/// What happens to the result list once scanning stops.
#[derive(Debug, Clone, Copy)]
struct AfterScan {
    export: bool,
    clear: bool,
}

async fn run_scan(
    config: &ConfigState,
    devices: DeviceState,
    notifier: Arc<dyn Notifier>,
    duration: Option<Duration>,
    after: AfterScan,
    json: bool,
) -> Result<(), ApiError> {
    let results = ResultsState::new();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping scan");
            on_interrupt.cancel();
        }
    });

    let outcome = commands::scan::scan(
        &results,
        config,
        &devices,
        notifier.clone(),
        duration,
        cancel,
    )
    .await;
    watcher.abort();
    let report = outcome?;

    let listing = commands::results::list_results(&results);
    print(json, &listing, || {
        for (index, event) in listing.events.iter().enumerate() {
            println!(
                "{:>4}  {:<24}  {:<12}  {}",
                index + 1,
                event.barcode(),
                event.format(),
                event.timestamp()
            );
        }
        println!(
            "total {}  unique {}  ({:?})",
            report.statistics.total, report.statistics.unique, report.ended
        );
    })?;

    if after.export {
        let exported =
            commands::export::export_and_clear(&results, config, notifier.as_ref(), after.clear);
        match exported {
            Ok(exported) => info!(path = ?exported.path, rows = exported.rows, "Export written"),
            Err(e) if e.code == ErrorCode::ExportEmpty => warn!("Nothing scanned, no export"),
            Err(e) => return Err(e),
        }
    }

    let remaining = commands::results::get_statistics(&results);
    debug!(total = remaining.total, unique = remaining.unique, "Scan run finished");
    Ok(())
}

/// Prints `value` as JSON, or runs `human` for text output.
fn print<T: Serialize>(json: bool, value: &T, human: impl FnOnce()) -> Result<(), ApiError> {
    if json {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|e| ApiError::internal(format!("Could not render output: {}", e)))?;
        println!("{}", rendered);
    } else {
        human();
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=barscan_capture=trace` - Show every decoded frame
/// - Default: INFO, DEBUG for the barscan crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,barscan=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
