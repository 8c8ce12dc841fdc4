//! # barscan-lookup: Customer Lookup Client
//!
//! Resolves a scanned customer code to the customer record held by the
//! external directory service.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Customer Lookup                                    │
//! │                                                                         │
//! │  scanned code ──► validate_lookup_code (trim, ≤64, no control chars)    │
//! │                          │                                              │
//! │                          ▼                                              │
//! │     GET {api_url}/api/customer/code/{percent-encoded code}              │
//! │                          │                                              │
//! │          ┌───────────────┼─────────────────┬─────────────────┐         │
//! │          ▼               ▼                 ▼                 ▼          │
//! │      2xx + JSON       non-2xx         transport error   bad JSON        │
//! │      Customer     LookupError::Status  ::Request        ::Decode        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried; the operator scans again.
//!
//! ## Modules
//! - [`client`] - `CustomerClient` and the `CustomerDirectory` seam
//! - [`error`] - Lookup error types

pub mod client;
pub mod error;

pub use client::{Customer, CustomerClient, CustomerDirectory};
pub use error::{LookupError, LookupResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
