//! Scripted camera and decoder for tests and demos.
//!
//! [`ScriptedCamera`] plays a timeline of labeled frames relative to the
//! moment it was acquired; [`ScriptedDecoder`] "decodes" a frame by reading
//! its label. Together they drive the whole pipeline under a paused Tokio
//! clock without a real camera.
//!
//! ## Label Conventions
//! | Label | Decode outcome |
//! |-------|----------------|
//! | none | `NotFound` |
//! | `!reason` | `Failed(reason)` |
//! | `QR:text` | `Decoded(text, QR_CODE)` |
//! | anything else | `Decoded(label, CODE_128)` |

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use barscan_core::{Decoded, Symbology};
use tokio::time::Instant;

use crate::camera::{CameraBackend, CameraConstraints, Frame, MediaStream};
use crate::decoder::{DecodeError, DecodeHints, DecoderFactory, FrameDecoder};
use crate::error::{CaptureError, CaptureResult};

// =============================================================================
// Scripted Camera
// =============================================================================

/// Camera that replays a fixed timeline.
#[derive(Debug, Clone)]
pub struct ScriptedCamera {
    timeline: Vec<(Duration, String)>,
    failure: Option<CaptureError>,
    ends: bool,
    live: Arc<AtomicUsize>,
    acquisitions: Arc<AtomicUsize>,
}

impl ScriptedCamera {
    /// Frames labeled `label` become current at `offset_ms` after acquisition.
    /// Between scripted frames the camera shows a blank frame.
    pub fn timeline<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        let mut timeline: Vec<(Duration, String)> = frames
            .into_iter()
            .map(|(ms, label)| (Duration::from_millis(ms), label.into()))
            .collect();
        timeline.sort_by_key(|(at, _)| *at);

        ScriptedCamera {
            timeline,
            failure: None,
            ends: false,
            live: Arc::new(AtomicUsize::new(0)),
            acquisitions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Camera that only ever shows blank frames.
    pub fn blank() -> Self {
        Self::timeline(Vec::<(u64, String)>::new())
    }

    /// Camera whose acquisition always fails with `error`.
    pub fn failing(error: CaptureError) -> Self {
        ScriptedCamera {
            failure: Some(error),
            ..Self::blank()
        }
    }

    /// End the stream once the last scripted frame has been shown.
    pub fn ending(mut self) -> Self {
        self.ends = true;
        self
    }

    /// Tracks currently running across every stream this camera handed out.
    pub fn live_tracks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraBackend for ScriptedCamera {
    async fn acquire(
        &self,
        _constraints: &CameraConstraints,
    ) -> CaptureResult<Box<dyn MediaStream>> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(ScriptedStream {
            started: Instant::now(),
            pending: self.timeline.iter().cloned().collect(),
            ends: self.ends,
            live: Some(self.live.clone()),
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedStream {
    started: Instant,
    pending: VecDeque<(Duration, String)>,
    ends: bool,
    /// `Some` while the track runs.
    live: Option<Arc<AtomicUsize>>,
}

impl MediaStream for ScriptedStream {
    fn grab(&mut self) -> Option<Frame> {
        self.live.as_ref()?;

        let elapsed = self.started.elapsed();
        match self.pending.front() {
            Some((at, _)) if *at <= elapsed => {
                let (_, label) = self.pending.pop_front()?;
                Some(Frame::blank().with_label(label))
            }
            Some(_) => Some(Frame::blank()),
            None if self.ends => None,
            None => Some(Frame::blank()),
        }
    }

    fn live_tracks(&self) -> usize {
        usize::from(self.live.is_some())
    }

    fn stop(&mut self) {
        if let Some(live) = self.live.take() {
            live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Scripted Decoder
// =============================================================================

/// Builds [`ScriptedDecoder`]s and counts their resets.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecoderFactory {
    init_error: Option<String>,
    created: Arc<AtomicUsize>,
    resets: Arc<AtomicUsize>,
}

impl ScriptedDecoderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose construction always fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        ScriptedDecoderFactory {
            init_error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl DecoderFactory for ScriptedDecoderFactory {
    fn create(&self, hints: &DecodeHints) -> CaptureResult<Box<dyn FrameDecoder>> {
        if let Some(reason) = &self.init_error {
            return Err(CaptureError::DecoderInit(reason.clone()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(ScriptedDecoder {
            hints: hints.clone(),
            resets: self.resets.clone(),
        }))
    }
}

/// Decodes frame labels, honoring the format hints.
pub struct ScriptedDecoder {
    hints: DecodeHints,
    resets: Arc<AtomicUsize>,
}

impl FrameDecoder for ScriptedDecoder {
    fn decode(&mut self, frame: &Frame) -> Result<Decoded, DecodeError> {
        let label = frame.label.as_deref().ok_or(DecodeError::NotFound)?;

        if let Some(reason) = label.strip_prefix('!') {
            return Err(DecodeError::Failed(reason.to_string()));
        }

        let decoded = match label.strip_prefix("QR:") {
            Some(text) => Decoded::new(text, Symbology::QrCode),
            None => Decoded::new(label, Symbology::Code128),
        };

        if self.hints.allows(decoded.symbology) {
            Ok(decoded)
        } else {
            Err(DecodeError::NotFound)
        }
    }

    fn reset(&mut self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timeline_frames_appear_on_schedule() {
        let camera = ScriptedCamera::timeline([(0, "A"), (500, "B")]).ending();
        let mut stream = camera.acquire(&CameraConstraints::default()).await.unwrap();

        assert_eq!(stream.grab().unwrap().label.as_deref(), Some("A"));
        assert_eq!(stream.grab().unwrap().label, None);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(stream.grab().unwrap().label.as_deref(), Some("B"));
        assert!(stream.grab().is_none());
    }

    #[tokio::test]
    async fn test_track_accounting() {
        let camera = ScriptedCamera::timeline([(0, "A")]);
        let mut stream = camera.acquire(&CameraConstraints::default()).await.unwrap();
        assert_eq!(camera.live_tracks(), 1);

        stream.stop();
        stream.stop();
        assert_eq!(camera.live_tracks(), 0);

        let other = camera.acquire(&CameraConstraints::default()).await.unwrap();
        assert_eq!(camera.live_tracks(), 1);
        drop(other);
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(camera.acquisitions(), 2);
    }

    #[tokio::test]
    async fn test_failing_camera() {
        let camera = ScriptedCamera::failing(CaptureError::PermissionDenied);
        let err = camera
            .acquire(&CameraConstraints::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err, CaptureError::PermissionDenied);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[test]
    fn test_decoder_label_conventions() {
        let factory = ScriptedDecoderFactory::new();
        let mut decoder = factory
            .create(&DecodeHints::formats([Symbology::Code128, Symbology::QrCode]))
            .unwrap();

        assert_eq!(decoder.decode(&Frame::blank()), Err(DecodeError::NotFound));
        assert_eq!(
            decoder.decode(&Frame::blank().with_label("!glare")),
            Err(DecodeError::Failed("glare".into()))
        );
        assert_eq!(
            decoder.decode(&Frame::blank().with_label("QR:hello")),
            Ok(Decoded::new("hello", Symbology::QrCode))
        );
        assert_eq!(
            decoder.decode(&Frame::blank().with_label("ABC123")),
            Ok(Decoded::new("ABC123", Symbology::Code128))
        );
    }

    #[test]
    fn test_decoder_honors_hints() {
        let mut decoder = ScriptedDecoderFactory::new()
            .create(&DecodeHints::default())
            .unwrap();
        assert_eq!(
            decoder.decode(&Frame::blank().with_label("QR:hello")),
            Err(DecodeError::NotFound)
        );
    }
}
