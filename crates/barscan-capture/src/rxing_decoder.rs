//! Decoder backend built on `rxing`, the Rust port of ZXing.

use barscan_core::{Decoded, Symbology};
use rxing::{BarcodeFormat, Exceptions};
use tracing::debug;

use crate::camera::Frame;
use crate::decoder::{DecodeError, DecodeHints, DecoderFactory, FrameDecoder};
use crate::error::{CaptureError, CaptureResult};

/// Builds [`RxingDecoder`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RxingDecoderFactory;

impl DecoderFactory for RxingDecoderFactory {
    fn create(&self, hints: &DecodeHints) -> CaptureResult<Box<dyn FrameDecoder>> {
        if hints.possible_formats.is_empty() {
            return Err(CaptureError::DecoderInit(
                "at least one barcode format is required".to_string(),
            ));
        }

        let mut formats = Vec::with_capacity(hints.possible_formats.len());
        for symbology in &hints.possible_formats {
            let format = to_rxing(*symbology).ok_or_else(|| {
                CaptureError::DecoderInit(format!("unsupported barcode format: {symbology}"))
            })?;
            formats.push(format);
        }

        debug!(formats = ?hints.possible_formats, "rxing decoder created");
        Ok(Box::new(RxingDecoder { formats }))
    }
}

/// ZXing-compatible frame decoder.
pub struct RxingDecoder {
    formats: Vec<BarcodeFormat>,
}

impl FrameDecoder for RxingDecoder {
    fn decode(&mut self, frame: &Frame) -> Result<Decoded, DecodeError> {
        let expected = frame.width as usize * frame.height as usize;
        if frame.luma.len() != expected {
            return Err(DecodeError::Failed(format!(
                "frame is {} bytes, expected {}x{}",
                frame.luma.len(),
                frame.width,
                frame.height
            )));
        }

        // A single format lets rxing skip the multi-format reader.
        let only = match self.formats.as_slice() {
            [format] => Some(*format),
            _ => None,
        };

        let luma = frame.luma.to_vec();
        let result = rxing::helpers::detect_in_luma(luma, frame.width, frame.height, only)
            .map_err(|e| match e {
                Exceptions::NotFoundException(_) => DecodeError::NotFound,
                other => DecodeError::Failed(other.to_string()),
            })?;

        let format = *result.getBarcodeFormat();
        if !self.formats.contains(&format) {
            return Err(DecodeError::NotFound);
        }

        Ok(Decoded::new(result.getText(), from_rxing(format)))
    }
}

fn to_rxing(symbology: Symbology) -> Option<BarcodeFormat> {
    let format = match symbology {
        Symbology::Aztec => BarcodeFormat::AZTEC,
        Symbology::Codabar => BarcodeFormat::CODABAR,
        Symbology::Code39 => BarcodeFormat::CODE_39,
        Symbology::Code93 => BarcodeFormat::CODE_93,
        Symbology::Code128 => BarcodeFormat::CODE_128,
        Symbology::DataMatrix => BarcodeFormat::DATA_MATRIX,
        Symbology::Ean8 => BarcodeFormat::EAN_8,
        Symbology::Ean13 => BarcodeFormat::EAN_13,
        Symbology::Itf => BarcodeFormat::ITF,
        Symbology::MaxiCode => BarcodeFormat::MAXICODE,
        Symbology::Pdf417 => BarcodeFormat::PDF_417,
        Symbology::QrCode => BarcodeFormat::QR_CODE,
        Symbology::MicroQrCode => BarcodeFormat::MICRO_QR_CODE,
        Symbology::Rss14 => BarcodeFormat::RSS_14,
        Symbology::RssExpanded => BarcodeFormat::RSS_EXPANDED,
        Symbology::UpcA => BarcodeFormat::UPC_A,
        Symbology::UpcE => BarcodeFormat::UPC_E,
        Symbology::UpcEanExtension => BarcodeFormat::UPC_EAN_EXTENSION,
        Symbology::Unknown => return None,
    };
    Some(format)
}

fn from_rxing(format: BarcodeFormat) -> Symbology {
    Symbology::ALL
        .into_iter()
        .find(|s| to_rxing(*s) == Some(format))
        .unwrap_or(Symbology::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_symbology_maps_both_ways() {
        for symbology in Symbology::ALL {
            let format = to_rxing(symbology).unwrap();
            assert_eq!(from_rxing(format), symbology);
        }
        assert_eq!(to_rxing(Symbology::Unknown), None);
    }

    #[test]
    fn test_empty_hints_fail_init() {
        let err = RxingDecoderFactory
            .create(&DecodeHints::formats([]))
            .err()
            .unwrap();
        assert!(matches!(err, CaptureError::DecoderInit(_)));
    }

    #[test]
    fn test_unknown_hint_fails_init() {
        let err = RxingDecoderFactory
            .create(&DecodeHints::formats([Symbology::Unknown]))
            .err()
            .unwrap();
        assert!(matches!(err, CaptureError::DecoderInit(_)));
    }

    #[test]
    fn test_blank_frame_decodes_nothing() {
        let mut decoder = RxingDecoderFactory.create(&DecodeHints::default()).unwrap();
        let frame = Frame::new(64, 64, vec![255u8; 64 * 64]);
        assert!(decoder.decode(&frame).is_err());
    }

    #[test]
    fn test_truncated_frame_fails() {
        let mut decoder = RxingDecoderFactory.create(&DecodeHints::default()).unwrap();
        let frame = Frame::new(64, 64, vec![0u8; 10]);
        assert!(matches!(decoder.decode(&frame), Err(DecodeError::Failed(_))));
    }
}
