//! Lookup error types.

use barscan_core::{Notice, ValidationError};
use thiserror::Error;

/// Result type alias for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

/// Customer lookup failures.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The code cannot be looked up at all.
    #[error("Invalid customer code: {0}")]
    InvalidCode(#[from] ValidationError),

    /// The configured API URL is unusable.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The service answered with a non-success status.
    #[error("Customer service returned HTTP {status}")]
    Status { status: u16 },

    /// The request never completed.
    #[error("Customer request failed: {0}")]
    Request(String),

    /// The body was not the expected JSON.
    #[error("Malformed customer response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            LookupError::Status {
                status: status.as_u16(),
            }
        } else {
            LookupError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

impl LookupError {
    /// True when the service said the customer does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::Status { status: 404 })
    }

    /// Every lookup failure surfaces as the same operator notice.
    pub fn notice(&self) -> Notice {
        Notice::LookupFailed
    }
}
