//! # Results State
//!
//! The station's result list.
//!
//! The store is wrapped in `Arc<Mutex<T>>` so the scan command and the
//! results commands can share it. Every mutation takes the lock for its
//! whole duration, so an append and its statistics are always consistent.

use std::sync::{Arc, Mutex, PoisonError};

use barscan_core::{Notice, ResultStore, ScanEvent, Statistics};
use tracing::info;

use crate::error::ApiError;
use crate::notifier::Notifier;

#[derive(Debug, Clone, Default)]
pub struct ResultsState {
    store: Arc<Mutex<ResultStore>>,
}

impl ResultsState {
    /// Creates an empty result list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let stats = results.with_store(|store| store.statistics());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ResultStore) -> R,
    {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    /// Executes a function with write access to the store.
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ResultStore) -> R,
    {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// Appends an accepted scan and announces it.
    pub fn record(
        &self,
        event: ScanEvent,
        notifier: &dyn Notifier,
    ) -> Result<Statistics, ApiError> {
        let code = event.barcode().to_string();
        let stats = self.with_store_mut(|store| store.append(event))?;

        info!(barcode = %code, total = stats.total, unique = stats.unique, "Scan recorded");
        notifier.notify(&Notice::ScanSuccess { code });

        Ok(stats)
    }

    pub fn statistics(&self) -> Statistics {
        self.with_store(ResultStore::statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::RecordingNotifier;
    use barscan_core::{Locale, Symbology};

    fn event(code: &str) -> ScanEvent {
        ScanEvent::new(code, Symbology::Code128, Locale::Vi).unwrap()
    }

    #[test]
    fn test_record_appends_and_notifies() {
        let results = ResultsState::new();
        let notifier = RecordingNotifier::new();

        results.record(event("ABC123"), &notifier).unwrap();
        let stats = results.record(event("ABC123"), &notifier).unwrap();

        assert_eq!(stats, Statistics { total: 2, unique: 1 });
        assert_eq!(
            notifier.notices(),
            vec![
                Notice::ScanSuccess { code: "ABC123".into() },
                Notice::ScanSuccess { code: "ABC123".into() },
            ]
        );
    }

    #[test]
    fn test_clones_share_one_store() {
        let results = ResultsState::new();
        let other = results.clone();

        results.record(event("XYZ999"), &RecordingNotifier::new()).unwrap();

        assert_eq!(other.statistics().total, 1);
        assert_eq!(
            other.with_store(|s| s.latest().map(|e| e.barcode().to_string())),
            Some("XYZ999".to_string())
        );
    }
}
