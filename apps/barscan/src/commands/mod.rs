//! # Commands Module
//!
//! Every operation the station offers. The CLI in `cli.rs` is a thin
//! dispatcher over these functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── scan.rs     ◄─── Streaming scan into the result list
//! ├── results.rs  ◄─── List, statistics, clear
//! ├── export.rs   ◄─── CSV download
//! └── lookup.rs   ◄─── Customer lookup and check-in
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs results
//! fn clear_results(results: &ResultsState, notifier: &dyn Notifier)
//!
//! // Needs results and config
//! fn export_csv(results: &ResultsState, config: &ConfigState, ...)
//!
//! // Needs everything
//! async fn scan(results: &ResultsState, config: &ConfigState, devices: &DeviceState, ...)
//! ```
//!
//! Failures come back as [`ApiError`](crate::error::ApiError). Operator
//! notices are sent before returning, so callers only print or exit.

pub mod export;
pub mod lookup;
pub mod results;
pub mod scan;
