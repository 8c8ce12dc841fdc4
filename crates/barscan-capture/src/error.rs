//! # Capture Error Types
//!
//! Error types for camera acquisition, decoder setup and session control.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Capture Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Acquisition    │  │    Decoder      │  │     Session             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  PermissionDen. │  │  DecoderInit    │  │  InvalidTransition      │ │
//! │  │  DeviceNotFound │  │                 │  │  NotScanning            │ │
//! │  │  Unsupported    │  │                 │  │  Timeout                │ │
//! │  │  Camera         │  │                 │  │  ChannelClosed          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Per-frame decode failures are NOT capture errors: they never leave    │
//! │  the decode loop (see `decoder::DecodeError`).                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use barscan_core::{CoreError, Notice, ScanAction, ScanPhase, ValidationError};
use thiserror::Error;

/// Result type alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Everything that can end or refuse a scanning attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    // =========================================================================
    // Acquisition Errors
    // =========================================================================
    /// The operator (or OS) refused camera access.
    #[error("Camera permission denied")]
    PermissionDenied,

    /// No camera matches the constraints.
    #[error("No camera device found")]
    DeviceNotFound,

    /// No capture facility exists at all.
    #[error("Camera capture is not supported on this platform")]
    Unsupported,

    /// Any other camera failure.
    #[error("Camera error: {0}")]
    Camera(String),

    // =========================================================================
    // Decoder Errors
    // =========================================================================
    /// The decoder could not be constructed.
    #[error("Decoder initialization failed: {0}")]
    DecoderInit(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Illegal lifecycle transition (e.g. start while streaming).
    #[error("Cannot apply {action:?} while {from:?}")]
    InvalidTransition { from: ScanPhase, action: ScanAction },

    /// Operation requires a streaming session.
    #[error("Session is not scanning")]
    NotScanning,

    /// No code was accepted in time (single-shot capture).
    #[error("No code scanned within {0} ms")]
    Timeout(u64),

    /// The decode loop went away.
    #[error("Decode loop channel closed")]
    ChannelClosed,

    /// A decoded value failed domain validation.
    #[error("Invalid scan: {0}")]
    InvalidScan(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for CaptureError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTransition { from, action } => {
                CaptureError::InvalidTransition { from, action }
            }
            CoreError::Validation(e) => CaptureError::InvalidScan(e.to_string()),
        }
    }
}

impl From<ValidationError> for CaptureError {
    fn from(err: ValidationError) -> Self {
        CaptureError::InvalidScan(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => CaptureError::DeviceNotFound,
            ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
            ErrorKind::Unsupported => CaptureError::Unsupported,
            _ => CaptureError::Camera(err.to_string()),
        }
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CaptureError {
    /// Returns true if this error ends the scanning attempt.
    ///
    /// Terminal errors put the session back into Idle; nothing is retried.
    /// `InvalidTransition` and `NotScanning` leave the session untouched.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            CaptureError::InvalidTransition { .. } | CaptureError::NotScanning
        )
    }

    /// The operator-facing notice for this error.
    pub fn notice(&self) -> Notice {
        match self {
            CaptureError::PermissionDenied => Notice::PermissionDenied,
            CaptureError::DeviceNotFound => Notice::DeviceNotFound,
            CaptureError::Unsupported => Notice::Unsupported,
            CaptureError::Camera(detail) => Notice::CameraError {
                detail: detail.clone(),
            },
            CaptureError::DecoderInit(_) => Notice::DecoderInit,
            CaptureError::Timeout(_) => Notice::ScanTimeout,
            other => Notice::CameraError {
                detail: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_errors() {
        assert!(CaptureError::PermissionDenied.is_terminal());
        assert!(CaptureError::DecoderInit("no formats".into()).is_terminal());
        assert!(CaptureError::Timeout(5000).is_terminal());

        assert!(!CaptureError::NotScanning.is_terminal());
        assert!(!CaptureError::InvalidTransition {
            from: ScanPhase::Streaming,
            action: ScanAction::Start,
        }
        .is_terminal());
    }

    #[test]
    fn test_io_error_classification() {
        use std::io::{Error, ErrorKind};

        assert_eq!(
            CaptureError::from(Error::from(ErrorKind::NotFound)),
            CaptureError::DeviceNotFound
        );
        assert_eq!(
            CaptureError::from(Error::from(ErrorKind::PermissionDenied)),
            CaptureError::PermissionDenied
        );
        assert!(matches!(
            CaptureError::from(Error::new(ErrorKind::Other, "busy")),
            CaptureError::Camera(_)
        ));
    }

    #[test]
    fn test_each_acquisition_error_has_its_own_notice() {
        assert_eq!(CaptureError::PermissionDenied.notice(), Notice::PermissionDenied);
        assert_eq!(CaptureError::DeviceNotFound.notice(), Notice::DeviceNotFound);
        assert_eq!(CaptureError::Unsupported.notice(), Notice::Unsupported);
        assert_eq!(
            CaptureError::Camera("device busy".into()).notice(),
            Notice::CameraError {
                detail: "device busy".into()
            }
        );
    }

    #[test]
    fn test_core_error_conversion() {
        let err: CaptureError = CoreError::InvalidTransition {
            from: ScanPhase::Idle,
            action: ScanAction::Granted,
        }
        .into();
        assert!(matches!(err, CaptureError::InvalidTransition { .. }));
    }
}
