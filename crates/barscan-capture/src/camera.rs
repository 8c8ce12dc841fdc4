//! # Camera Acquisition
//!
//! Camera backends, the frames they produce, and the scoped lease that owns
//! an acquired stream.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stream Ownership                                     │
//! │                                                                         │
//! │  CameraBackend::acquire(constraints)                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Box<dyn MediaStream> ──► StreamLease (single owner)                   │
//! │                                │                                        │
//! │            ┌───────────────────┼───────────────────┐                   │
//! │            ▼                   ▼                   ▼                    │
//! │        grab()             release()             drop()                  │
//! │     current frame      stop all tracks       release() if live          │
//! │                        (exactly once)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Frame grabbing is synchronous: a stream always has a "current" frame
//! ready, the way a video element does. Only acquisition suspends.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CaptureResult;

// =============================================================================
// Constraints
// =============================================================================

/// Which camera to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera.
    #[default]
    Environment,
    /// Front (selfie) camera.
    User,
}

/// Requested stream properties. Resolutions are ideals, not requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub audio: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        CameraConstraints {
            facing: FacingMode::Environment,
            ideal_width: 1280,
            ideal_height: 720,
            audio: false,
        }
    }
}

// =============================================================================
// Frame
// =============================================================================

/// One 8-bit grayscale frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major luma, `width * height` bytes.
    pub luma: Arc<[u8]>,
    /// Where the frame came from (file name, script label).
    pub label: Option<String>,
}

impl Frame {
    pub fn new(width: u32, height: u32, luma: impl Into<Arc<[u8]>>) -> Self {
        Frame {
            width,
            height,
            luma: luma.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// A 1x1 black frame. Decodes to nothing.
    pub fn blank() -> Self {
        Frame::new(1, 1, vec![0u8])
    }
}

// =============================================================================
// Backend Traits
// =============================================================================

/// A live media stream.
pub trait MediaStream: Send {
    /// Returns the current frame, or `None` once the stream has ended.
    fn grab(&mut self) -> Option<Frame>;

    /// Number of tracks still running.
    fn live_tracks(&self) -> usize;

    /// Stops every track.
    fn stop(&mut self);
}

/// Something that can hand out camera streams.
#[async_trait]
pub trait CameraBackend: Send + Sync {
    /// Requests a stream matching `constraints`.
    ///
    /// ## Errors
    /// - `PermissionDenied` when access was refused
    /// - `DeviceNotFound` when no device matches
    /// - `Unsupported` when the platform has no camera facility
    /// - `Camera` for anything else
    async fn acquire(&self, constraints: &CameraConstraints) -> CaptureResult<Box<dyn MediaStream>>;

    /// Short human-readable backend name for logs.
    fn name(&self) -> &str;
}

// =============================================================================
// Stream Lease
// =============================================================================

/// Single owner of an acquired stream.
pub struct StreamLease {
    stream: Option<Box<dyn MediaStream>>,
}

impl StreamLease {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        StreamLease {
            stream: Some(stream),
        }
    }

    /// Current frame of a live stream.
    pub fn grab(&mut self) -> Option<Frame> {
        self.stream.as_mut().and_then(|s| s.grab())
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Stops all tracks. Later calls are no-ops.
    ///
    /// Returns true if this call did the stopping.
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(mut stream) => {
                let tracks = stream.live_tracks();
                stream.stop();
                debug!(tracks, "Camera stream released");
                true
            }
            None => false,
        }
    }
}

impl Drop for StreamLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamLease")
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStream {
        stops: Arc<AtomicUsize>,
        live: bool,
    }

    impl MediaStream for CountingStream {
        fn grab(&mut self) -> Option<Frame> {
            self.live.then(Frame::blank)
        }

        fn live_tracks(&self) -> usize {
            usize::from(self.live)
        }

        fn stop(&mut self) {
            self.live = false;
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn lease() -> (StreamLease, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        let stream = CountingStream {
            stops: stops.clone(),
            live: true,
        };
        (StreamLease::new(Box::new(stream)), stops)
    }

    #[test]
    fn test_default_constraints() {
        let c = CameraConstraints::default();
        assert_eq!(c.facing, FacingMode::Environment);
        assert_eq!((c.ideal_width, c.ideal_height), (1280, 720));
        assert!(!c.audio);
    }

    #[test]
    fn test_release_stops_exactly_once() {
        let (mut lease, stops) = lease();
        assert!(lease.grab().is_some());

        assert!(lease.release());
        assert!(!lease.release());
        drop(lease);

        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases() {
        let (lease, stops) = lease();
        drop(lease);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_grab_after_release_is_none() {
        let (mut lease, _) = lease();
        lease.release();
        assert!(lease.grab().is_none());
        assert!(!lease.is_live());
    }

    #[test]
    fn test_facing_mode_serde() {
        assert_eq!(
            serde_json::to_string(&FacingMode::Environment).unwrap(),
            "\"environment\""
        );
    }
}
