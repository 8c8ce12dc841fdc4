//! # Results Commands
//!
//! Reading and clearing the result list.

use barscan_core::{Notice, ScanEvent, Statistics};
use serde::Serialize;
use tracing::{debug, info};

use crate::notifier::Notifier;
use crate::state::ResultsState;

/// Result list with its counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    /// Newest first.
    pub events: Vec<ScanEvent>,
    pub statistics: Statistics,
}

/// Gets the result list, most recent scan first.
pub fn list_results(results: &ResultsState) -> ResultsResponse {
    debug!("list_results command");
    results.with_store(|store| ResultsResponse {
        events: store.to_vec(),
        statistics: store.statistics(),
    })
}

/// Gets the total and unique counters.
pub fn get_statistics(results: &ResultsState) -> Statistics {
    debug!("get_statistics command");
    results.statistics()
}

/// Clears every result and resets the counters.
pub fn clear_results(results: &ResultsState, notifier: &dyn Notifier) -> Statistics {
    let stats = results.with_store_mut(|store| {
        store.clear();
        store.statistics()
    });

    info!("Results cleared");
    notifier.notify(&Notice::ResultsCleared);
    stats
}
