//! # Result Store
//!
//! In-memory, newest-first list of accepted scans.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Result Store Operations                              │
//! │                                                                         │
//! │  Accepted scan ──────────► append(event) ──► push_front + stats        │
//! │                                                                         │
//! │  Operator "Clear" ───────► clear() ────────► empty + stats = 0         │
//! │                                                                         │
//! │  Render / export ────────► events() ───────► newest → oldest           │
//! │                                                                         │
//! │  NO update, NO per-entry delete: the list is append-only until clear.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::CoreResult;
use crate::types::{ScanEvent, Statistics};
use crate::validation::validate_barcode;

/// Ordered scan results with derived statistics.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    /// Newest first.
    events: VecDeque<ScanEvent>,

    /// Occurrences per barcode value, for the unique counter.
    occurrences: HashMap<String, usize>,

    stats: Statistics,
}

impl ResultStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an event and returns the recomputed statistics.
    ///
    /// ## Errors
    /// Rejects events with an empty barcode. Events built through the
    /// [`ScanEvent`] constructors never fail here, but deserialized ones can.
    pub fn append(&mut self, event: ScanEvent) -> CoreResult<Statistics> {
        validate_barcode(event.barcode())?;

        *self
            .occurrences
            .entry(event.barcode().to_string())
            .or_insert(0) += 1;
        self.events.push_front(event);
        self.recompute();

        Ok(self.stats)
    }

    /// Empties the store and resets statistics to zero.
    pub fn clear(&mut self) {
        self.events.clear();
        self.occurrences.clear();
        self.recompute();
    }

    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Events from most recent to oldest.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &ScanEvent> + '_ {
        self.events.iter()
    }

    /// Most recent event, if any.
    pub fn latest(&self) -> Option<&ScanEvent> {
        self.events.front()
    }

    /// Snapshot of all events, newest first.
    pub fn to_vec(&self) -> Vec<ScanEvent> {
        self.events.iter().cloned().collect()
    }

    /// How many times `barcode` has been accepted.
    pub fn count_of(&self, barcode: &str) -> usize {
        self.occurrences.get(barcode).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn recompute(&mut self) {
        self.stats = Statistics {
            total: self.events.len(),
            unique: self.occurrences.len(),
        };
    }
}
