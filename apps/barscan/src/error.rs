//! # API Error Type
//!
//! Unified error type for station commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Barscan                                │
//! │                                                                         │
//! │  CLI (main.rs)               Commands                                   │
//! │  ─────────────               ────────                                   │
//! │                                                                         │
//! │  barscan checkin --source ./frames                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Camera Error? ─── CaptureError::PermissionDenied ──┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Lookup Error? ─── LookupError::Status { 404 } ─── ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  error: [PermissionDenied] Camera permission denied                    │
//! │  (exit status 1; the localized notice was already shown)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! `ApiError` is serializable so `--json` output can carry both a
//! machine-readable `code` and a human-readable `message`.

use barscan_capture::CaptureError;
use barscan_core::{CoreError, ExportError, ValidationError};
use barscan_lookup::LookupError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// API Error
// =============================================================================

/// Error returned from station commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: KH-0042"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (customer, file)
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Camera permission was refused
    PermissionDenied,

    /// No usable camera
    DeviceNotFound,

    /// Camera or decoder failure
    CameraError,

    /// Lifecycle rule broken (e.g. start while streaming)
    InvalidState,

    /// Single-shot scan gave up waiting
    Timeout,

    /// Nothing to export
    ExportEmpty,

    /// Customer service failure
    LookupFailed,

    /// Bad configuration file or override
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts capture errors to API errors.
impl From<CaptureError> for ApiError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::PermissionDenied => {
                ApiError::new(ErrorCode::PermissionDenied, "Camera permission denied")
            }
            CaptureError::DeviceNotFound => {
                ApiError::new(ErrorCode::DeviceNotFound, "No camera found")
            }
            CaptureError::Unsupported => ApiError::new(
                ErrorCode::DeviceNotFound,
                "This machine has no camera support",
            ),
            CaptureError::Camera(detail) => {
                ApiError::new(ErrorCode::CameraError, format!("Camera error: {}", detail))
            }
            CaptureError::DecoderInit(reason) => {
                tracing::error!("Decoder construction failed: {}", reason);
                ApiError::new(ErrorCode::CameraError, "Barcode decoder could not start")
            }
            e @ (CaptureError::InvalidTransition { .. } | CaptureError::NotScanning) => {
                ApiError::new(ErrorCode::InvalidState, e.to_string())
            }
            CaptureError::Timeout(ms) => ApiError::new(
                ErrorCode::Timeout,
                format!("No barcode scanned within {} ms", ms),
            ),
            CaptureError::ChannelClosed => {
                ApiError::new(ErrorCode::CameraError, "Camera stream ended")
            }
            CaptureError::InvalidScan(reason) => ApiError::validation(reason),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            e @ CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::InvalidState, e.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Empty => ApiError::new(ErrorCode::ExportEmpty, err.to_string()),
        }
    }
}

/// Converts lookup errors to API errors.
impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidCode(e) => ApiError::validation(e.to_string()),
            e @ LookupError::Status { status: 404 } => {
                ApiError::new(ErrorCode::NotFound, e.to_string())
            }
            LookupError::InvalidUrl(url) => {
                ApiError::new(ErrorCode::ConfigError, format!("Invalid API URL: {}", url))
            }
            e => {
                tracing::error!("Customer lookup failed: {}", e);
                ApiError::new(ErrorCode::LookupFailed, e.to_string())
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        match err.kind() {
            std::io::ErrorKind::NotFound => ApiError::new(ErrorCode::NotFound, err.to_string()),
            _ => ApiError::internal(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Config Error
// =============================================================================

/// Failures while loading, validating or saving `barscan.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid config: {0}")]
    Validation(#[from] ValidationError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
