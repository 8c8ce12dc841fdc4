//! # Error Types
//!
//! Domain-specific error types for barscan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  barscan-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ExportError      - CSV export refusals                            │
//! │                                                                         │
//! │  barscan-capture errors (separate crate)                               │
//! │  └── CaptureError     - Camera / decoder / session failures            │
//! │                                                                         │
//! │  barscan-lookup errors (separate crate)                                │
//! │  └── LookupError      - Customer API failures                          │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CaptureError → ApiError → Notice  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::lifecycle::{ScanAction, ScanPhase};

// =============================================================================
// Core Error
// =============================================================================

/// Core scanning rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A lifecycle action was applied in a phase that does not allow it.
    ///
    /// ## When This Occurs
    /// - `Start` while a stream is already live
    /// - `Granted` without a pending permission request
    #[error("Cannot apply {action:?} while {from:?}")]
    InvalidTransition { from: ScanPhase, action: ScanAction },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., control characters in a lookup code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Export Error
// =============================================================================

/// Reasons an export request produced no file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    /// Nothing has been scanned yet.
    #[error("No scan results to export")]
    Empty,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::TooLong {
            field: "code".to_string(),
            max: 64,
        };
        assert_eq!(err.to_string(), "code must be at most 64 characters");
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = CoreError::InvalidTransition {
            from: ScanPhase::Streaming,
            action: ScanAction::Start,
        };
        assert_eq!(err.to_string(), "Cannot apply Start while Streaming");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_export_error_message() {
        assert_eq!(ExportError::Empty.to_string(), "No scan results to export");
    }
}
