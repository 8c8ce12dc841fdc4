//! # Decoder Adapter
//!
//! The seam between frames and decoded values. A third-party decoding
//! library sits behind [`FrameDecoder`]; the rest of the pipeline never
//! sees it.
//!
//! ## Per-Frame Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    decode(frame)                                        │
//! │                                                                         │
//! │   Ok(Decoded)            ──► forwarded to the dedup gate               │
//! │   Err(NotFound)          ──► expected on most frames, dropped silently │
//! │   Err(Failed(reason))    ──► logged at WARN, loop continues            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoders are never shared: a [`DecoderFactory`] builds one per session
//! and the session resets and drops it on stop.

use barscan_core::{Decoded, Symbology};
use thiserror::Error;

use crate::camera::Frame;
use crate::error::CaptureResult;

/// Why a single decode attempt produced nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// No code in this frame.
    #[error("No barcode found in frame")]
    NotFound,

    /// The decoder hit something it could not handle.
    #[error("Decode failed: {0}")]
    Failed(String),
}

/// Decodes one frame at a time.
pub trait FrameDecoder: Send {
    fn decode(&mut self, frame: &Frame) -> Result<Decoded, DecodeError>;

    /// Releases decoder-internal resources. The decoder may be reused after.
    fn reset(&mut self) {}
}

/// Formats the decoder should look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeHints {
    pub possible_formats: Vec<Symbology>,
}

impl Default for DecodeHints {
    fn default() -> Self {
        DecodeHints {
            possible_formats: vec![Symbology::Code128],
        }
    }
}

impl DecodeHints {
    pub fn formats(formats: impl IntoIterator<Item = Symbology>) -> Self {
        DecodeHints {
            possible_formats: formats.into_iter().collect(),
        }
    }

    pub fn allows(&self, symbology: Symbology) -> bool {
        self.possible_formats.contains(&symbology)
    }
}

/// Builds a fresh decoder for each session.
pub trait DecoderFactory: Send + Sync {
    /// ## Errors
    /// `CaptureError::DecoderInit` when the hints cannot be honored.
    fn create(&self, hints: &DecodeHints) -> CaptureResult<Box<dyn FrameDecoder>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hints_are_code_128_only() {
        let hints = DecodeHints::default();
        assert_eq!(hints.possible_formats, vec![Symbology::Code128]);
        assert!(hints.allows(Symbology::Code128));
        assert!(!hints.allows(Symbology::QrCode));
    }

    #[test]
    fn test_hint_formats() {
        let hints = DecodeHints::formats([Symbology::QrCode, Symbology::Ean13]);
        assert!(hints.allows(Symbology::Ean13));
        assert!(!hints.allows(Symbology::Code128));
    }
}
