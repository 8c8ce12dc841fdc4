//! # barscan-core: Pure Scan Logic for Barscan
//!
//! This crate is the **heart** of Barscan. It holds every scanning rule as
//! plain data and deterministic functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Barscan Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/barscan (CLI)                           │   │
//! │  │    scan ──► results ──► export ──► checkin / lookup             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          barscan-capture (camera, decoder, session)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ barscan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  dedup  │ │  store  │ │ export  │ │lifecycle│  │   │
//! │  │   │ScanEvent│ │DedupGate│ │ Results │ │   CSV   │ │  Phase  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CAMERA • NO NETWORK • CALLER-SUPPLIED TIME        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ScanEvent, Symbology, Statistics)
//! - [`dedup`] - Suppression of rapid repeat scans
//! - [`store`] - Newest-first, append-only result list
//! - [`export`] - CSV rendering of the result list
//! - [`lifecycle`] - Scan lifecycle state machine
//! - [`notice`] - Localized user-facing notices (vi / ja / en)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use barscan_core::{DedupGate, Locale, ResultStore, ScanEvent, Symbology};
//!
//! let mut gate = DedupGate::new(Duration::from_millis(1000));
//! let mut store = ResultStore::new();
//! let t0 = Instant::now();
//!
//! for (code, offset_ms) in [("ABC123", 0), ("ABC123", 500), ("ABC123", 1500)] {
//!     let now = t0 + Duration::from_millis(offset_ms);
//!     if gate.offer(code, now).is_accepted() {
//!         let event = ScanEvent::new(code, Symbology::Code128, Locale::Vi).unwrap();
//!         store.append(event).unwrap();
//!     }
//! }
//!
//! assert_eq!(store.statistics().total, 2);
//! assert_eq!(store.statistics().unique, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dedup;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod notice;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use dedup::{DedupGate, Offer};
pub use error::{CoreError, CoreResult, ExportError, ValidationError};
pub use export::{CsvExport, CSV_HEADER};
pub use lifecycle::{ScanAction, ScanPhase};
pub use notice::{Locale, Notice, Severity};
pub use store::ResultStore;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default suppression window for identical consecutive scans.
///
/// ## Why one second?
/// Handheld scanning keeps a code in front of the camera for several
/// frames. One second covers the dwell time of a single "pass" while still
/// letting an operator deliberately re-scan the same item.
pub const DEFAULT_SUPPRESSION_WINDOW_MS: u64 = 1000;

/// Maximum accepted length of a decoded barcode value.
///
/// QR codes top out near 7k numeric characters; anything beyond this is
/// treated as decoder garbage.
pub const MAX_BARCODE_LEN: usize = 4096;
