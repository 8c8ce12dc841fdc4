//! # Domain Types
//!
//! Core domain types used throughout Barscan.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Decoded      │   │   ScanEvent     │   │   Statistics    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  text           │──►│  id (UUID v7)   │──►│  total          │       │
//! │  │  symbology      │   │  barcode        │   │  unique         │       │
//! │  └─────────────────┘   │  format         │   └─────────────────┘       │
//! │     decoder output     │  timestamp      │     derived from store      │
//! │                        │  scanned_at     │                              │
//! │                        └─────────────────┘                              │
//! │                          accepted scan                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Scan events carry a UUID v7: unique without coordination and ordered by
//! creation time, so two scans within the same millisecond stay distinct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::notice::Locale;
use crate::validation::{validate_barcode, ValidationResult};

// =============================================================================
// Symbology
// =============================================================================

/// Barcode format / standard of a decoded value.
///
/// Serialized with the ZXing-style tags that operators already know from
/// exported files (`CODE_128`, `QR_CODE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    #[serde(rename = "AZTEC")]
    Aztec,
    #[serde(rename = "CODABAR")]
    Codabar,
    #[serde(rename = "CODE_39")]
    Code39,
    #[serde(rename = "CODE_93")]
    Code93,
    #[serde(rename = "CODE_128")]
    Code128,
    #[serde(rename = "DATA_MATRIX")]
    DataMatrix,
    #[serde(rename = "EAN_8")]
    Ean8,
    #[serde(rename = "EAN_13")]
    Ean13,
    #[serde(rename = "ITF")]
    Itf,
    #[serde(rename = "MAXICODE")]
    MaxiCode,
    #[serde(rename = "PDF_417")]
    Pdf417,
    #[serde(rename = "QR_CODE")]
    QrCode,
    #[serde(rename = "MICRO_QR_CODE")]
    MicroQrCode,
    #[serde(rename = "RSS_14")]
    Rss14,
    #[serde(rename = "RSS_EXPANDED")]
    RssExpanded,
    #[serde(rename = "UPC_A")]
    UpcA,
    #[serde(rename = "UPC_E")]
    UpcE,
    #[serde(rename = "UPC_EAN_EXTENSION")]
    UpcEanExtension,
    /// The decoder reported a format we have no tag for.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Symbology {
    /// Every symbology except [`Symbology::Unknown`].
    pub const ALL: [Symbology; 18] = [
        Symbology::Aztec,
        Symbology::Codabar,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::DataMatrix,
        Symbology::Ean8,
        Symbology::Ean13,
        Symbology::Itf,
        Symbology::MaxiCode,
        Symbology::Pdf417,
        Symbology::QrCode,
        Symbology::MicroQrCode,
        Symbology::Rss14,
        Symbology::RssExpanded,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::UpcEanExtension,
    ];

    /// Returns the display tag (`CODE_128`, `QR_CODE`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Symbology::Aztec => "AZTEC",
            Symbology::Codabar => "CODABAR",
            Symbology::Code39 => "CODE_39",
            Symbology::Code93 => "CODE_93",
            Symbology::Code128 => "CODE_128",
            Symbology::DataMatrix => "DATA_MATRIX",
            Symbology::Ean8 => "EAN_8",
            Symbology::Ean13 => "EAN_13",
            Symbology::Itf => "ITF",
            Symbology::MaxiCode => "MAXICODE",
            Symbology::Pdf417 => "PDF_417",
            Symbology::QrCode => "QR_CODE",
            Symbology::MicroQrCode => "MICRO_QR_CODE",
            Symbology::Rss14 => "RSS_14",
            Symbology::RssExpanded => "RSS_EXPANDED",
            Symbology::UpcA => "UPC_A",
            Symbology::UpcE => "UPC_E",
            Symbology::UpcEanExtension => "UPC_EAN_EXTENSION",
            Symbology::Unknown => "UNKNOWN",
        }
    }

    /// True for 2D matrix codes (QR, Data Matrix, Aztec, ...).
    pub const fn is_matrix(&self) -> bool {
        matches!(
            self,
            Symbology::Aztec
                | Symbology::DataMatrix
                | Symbology::MaxiCode
                | Symbology::Pdf417
                | Symbology::QrCode
                | Symbology::MicroQrCode
        )
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Symbology {
    type Err = crate::error::ValidationError;

    /// Parses a tag, tolerating case and `-`/space separators
    /// (`code-128`, `qr code`, `CODE_128`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        if normalized == "UNKNOWN" {
            return Ok(Symbology::Unknown);
        }

        Symbology::ALL
            .iter()
            .copied()
            .find(|sym| sym.as_str() == normalized)
            .ok_or_else(|| crate::error::ValidationError::NotAllowed {
                field: "format".to_string(),
                allowed: Symbology::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Decoded
// =============================================================================

/// A single successful decode attempt, before the dedup gate sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    /// Decoded text payload.
    pub text: String,

    /// Symbology the decoder recognised.
    pub symbology: Symbology,
}

impl Decoded {
    pub fn new(text: impl Into<String>, symbology: Symbology) -> Self {
        Decoded {
            text: text.into(),
            symbology,
        }
    }
}

// =============================================================================
// Scan Event
// =============================================================================

/// An accepted scan, as stored in the result list.
///
/// ## Invariants
/// - `barcode` is never empty (enforced by the constructors)
/// - Immutable once created: there are no setters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    /// Unique, time-ordered identifier (UUID v7).
    id: String,

    /// Decoded text.
    barcode: String,

    /// Symbology tag.
    format: Symbology,

    /// Localized display string, rendered once at creation.
    timestamp: String,

    /// Machine timestamp of the scan.
    scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    /// Creates an event stamped with the current time.
    pub fn new(
        barcode: impl Into<String>,
        format: Symbology,
        locale: Locale,
    ) -> ValidationResult<Self> {
        Self::at(barcode, format, Utc::now(), locale)
    }

    /// Creates an event for an explicit scan time.
    ///
    /// The display timestamp uses the machine's local time zone, matching
    /// what the operator sees on the wall clock.
    pub fn at(
        barcode: impl Into<String>,
        format: Symbology,
        scanned_at: DateTime<Utc>,
        locale: Locale,
    ) -> ValidationResult<Self> {
        let barcode = barcode.into();
        validate_barcode(&barcode)?;

        let timestamp = locale.format_timestamp(&scanned_at.with_timezone(&chrono::Local));

        Ok(ScanEvent {
            id: Uuid::now_v7().to_string(),
            barcode,
            format,
            timestamp,
            scanned_at,
        })
    }

    /// Creates an event from a decoder result.
    pub fn from_decoded(decoded: Decoded, locale: Locale) -> ValidationResult<Self> {
        Self::new(decoded.text, decoded.symbology, locale)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn format(&self) -> Symbology {
        self.format
    }

    /// Localized display timestamp.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Counters derived from the result store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of accepted scans.
    pub total: usize,

    /// Number of distinct barcode values.
    pub unique: usize,
}

impl Statistics {
    /// Zero counters (empty store).
    pub const fn zero() -> Self {
        Statistics {
            total: 0,
            unique: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_symbology_display() {
        assert_eq!(Symbology::Code128.to_string(), "CODE_128");
        assert_eq!(Symbology::QrCode.to_string(), "QR_CODE");
        assert_eq!(Symbology::UpcEanExtension.to_string(), "UPC_EAN_EXTENSION");
    }

    #[test]
    fn test_symbology_parsing() {
        assert_eq!("CODE_128".parse::<Symbology>().unwrap(), Symbology::Code128);
        assert_eq!("code-128".parse::<Symbology>().unwrap(), Symbology::Code128);
        assert_eq!("qr code".parse::<Symbology>().unwrap(), Symbology::QrCode);
        assert_eq!("unknown".parse::<Symbology>().unwrap(), Symbology::Unknown);
        assert!("CODE_999".parse::<Symbology>().is_err());
    }

    #[test]
    fn test_symbology_serde_matches_display() {
        for sym in Symbology::ALL {
            let json = serde_json::to_string(&sym).unwrap();
            assert_eq!(json, format!("\"{}\"", sym));
        }
    }

    #[test]
    fn test_matrix_codes() {
        assert!(Symbology::QrCode.is_matrix());
        assert!(!Symbology::Code128.is_matrix());
    }

    #[test]
    fn test_scan_event_rejects_empty_barcode() {
        assert!(ScanEvent::new("", Symbology::Code128, Locale::Vi).is_err());
        assert!(ScanEvent::new("   ", Symbology::Code128, Locale::Vi).is_err());
    }

    #[test]
    fn test_scan_events_get_distinct_ids() {
        let at = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap();
        let a = ScanEvent::at("ABC123", Symbology::Code128, at, Locale::En).unwrap();
        let b = ScanEvent::at("ABC123", Symbology::Code128, at, Locale::En).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.scanned_at(), at);
        assert!(!a.timestamp().is_empty());
    }

    #[test]
    fn test_scan_event_serializes_camel_case() {
        let event = ScanEvent::new("XYZ999", Symbology::QrCode, Locale::Vi).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["barcode"], "XYZ999");
        assert_eq!(json["format"], "QR_CODE");
        assert!(json.get("scannedAt").is_some());
    }
}
