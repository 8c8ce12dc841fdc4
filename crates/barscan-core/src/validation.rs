//! # Validation Module
//!
//! Input validation utilities for Barscan.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Decoder                                                      │
//! │  └── Produces text + symbology (may be garbage under glare)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Barcode text is non-empty and bounded                             │
//! │  ├── Lookup codes are single-line and bounded                          │
//! │  └── Config values are in range                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Result store                                                 │
//! │  └── Refuses events that slipped past (append returns Err)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use barscan_core::validation::{validate_barcode, validate_lookup_code};
//!
//! validate_barcode("ABC123").unwrap();
//! assert_eq!(validate_lookup_code("  KH-001 ").unwrap(), "KH-001");
//! ```

use crate::error::ValidationError;
use crate::MAX_BARCODE_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a customer lookup code.
pub const MAX_LOOKUP_CODE_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates decoded barcode text.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - Must be at most [`MAX_BARCODE_LEN`] characters
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    if barcode.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.chars().count() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    Ok(())
}

/// Validates a customer lookup code.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 64 characters
/// - Must not contain control characters (line breaks, tabs, NUL)
///
/// ## Returns
/// The trimmed code.
///
/// ## Example
/// ```rust
/// use barscan_core::validation::validate_lookup_code;
///
/// assert!(validate_lookup_code("KH-001").is_ok());
/// assert!(validate_lookup_code("").is_err());
/// assert!(validate_lookup_code("A\nB").is_err());
/// ```
pub fn validate_lookup_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_LOOKUP_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_LOOKUP_CODE_LEN,
        });
    }

    if code.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(code.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a duration-like setting in milliseconds.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_positive_ms(field: &str, ms: u64) -> ValidationResult<()> {
    if ms == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a requested capture resolution.
pub fn validate_resolution(width: u32, height: u32) -> ValidationResult<()> {
    if width == 0 {
        return Err(ValidationError::MustBePositive {
            field: "ideal_width".to_string(),
        });
    }
    if height == 0 {
        return Err(ValidationError::MustBePositive {
            field: "ideal_height".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("ABC123").is_ok());
        assert!(validate_barcode("8934567890123").is_ok());
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode(" \t").is_err());
        assert!(validate_barcode(&"9".repeat(MAX_BARCODE_LEN)).is_ok());
        assert!(validate_barcode(&"9".repeat(MAX_BARCODE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_lookup_code() {
        assert_eq!(validate_lookup_code(" KH-001 ").unwrap(), "KH-001");
        assert!(validate_lookup_code("").is_err());
        assert!(validate_lookup_code(&"A".repeat(65)).is_err());
        assert!(validate_lookup_code("KH\u{0}01").is_err());
    }

    #[test]
    fn test_lookup_code_keeps_unicode() {
        assert_eq!(validate_lookup_code("khách-01").unwrap(), "khách-01");
    }

    #[test]
    fn test_validate_positive_ms() {
        assert!(validate_positive_ms("suppression_window_ms", 1000).is_ok());
        let err = validate_positive_ms("suppression_window_ms", 0).unwrap_err();
        assert_eq!(err.to_string(), "suppression_window_ms must be positive");
    }

    #[test]
    fn test_validate_resolution() {
        assert!(validate_resolution(1280, 720).is_ok());
        assert!(validate_resolution(0, 720).is_err());
        assert!(validate_resolution(1280, 0).is_err());
    }
}
