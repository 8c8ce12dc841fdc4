//! # Decode Loop
//!
//! Continuous frame polling as a cancelable background task.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Decode Loop Task                                     │
//! │                                                                         │
//! │   every frame_interval (16ms):                                          │
//! │     lease.grab() ──► decoder.decode(frame)                             │
//! │                          │                                              │
//! │            ┌─────────────┼──────────────────┐                          │
//! │            ▼             ▼                  ▼                           │
//! │        Decoded       NotFound          Failed(reason)                   │
//! │     send Detection    (silent)          warn! + continue                │
//! │                                                                         │
//! │   exits on: cancel token │ stream ended │ receiver dropped             │
//! │   on exit:  decoder.reset() then drop                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use barscan_core::Decoded;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::camera::StreamLease;
use crate::decoder::{DecodeError, FrameDecoder};

/// Default pause between decode attempts (about one display frame).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Detections buffered between the loop and its consumer.
const DETECTION_BUFFER: usize = 32;

/// A successful decode and when it was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub decoded: Decoded,
    pub observed_at: Instant,
}

/// Handle to a running decode loop.
#[derive(Debug)]
pub struct DecodeLoopHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl DecodeLoopHandle {
    /// Signals the loop to stop without waiting.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stops the loop and waits until the decoder has been reset.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            warn!(error = %e, "Decode loop ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Spawns the decode loop.
///
/// The loop shares `lease` with its owner so the owner can release the
/// camera synchronously; the decoder is owned by the loop outright.
pub fn spawn(
    lease: Arc<Mutex<StreamLease>>,
    decoder: Box<dyn FrameDecoder>,
    frame_interval: Duration,
) -> (DecodeLoopHandle, ReceiverStream<Detection>) {
    let (tx, rx) = mpsc::channel(DETECTION_BUFFER);
    let cancel = CancellationToken::new();

    let join = tokio::spawn(run(lease, decoder, frame_interval, tx, cancel.clone()));

    (DecodeLoopHandle { cancel, join }, ReceiverStream::new(rx))
}

async fn run(
    lease: Arc<Mutex<StreamLease>>,
    mut decoder: Box<dyn FrameDecoder>,
    frame_interval: Duration,
    tx: mpsc::Sender<Detection>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut attempts: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(attempts, "Decode loop cancelled");
                break;
            }
            _ = ticker.tick() => {}
        }

        let frame = match lease.lock() {
            Ok(mut lease) => lease.grab(),
            Err(_) => None,
        };
        let Some(frame) = frame else {
            debug!(attempts, "Camera stream ended");
            break;
        };

        attempts += 1;
        let decoded = match decoder.decode(&frame) {
            Ok(decoded) => decoded,
            Err(DecodeError::NotFound) => continue,
            Err(DecodeError::Failed(reason)) => {
                warn!(frame = ?frame.label, %reason, "Decode attempt failed");
                continue;
            }
        };

        trace!(barcode = %decoded.text, format = %decoded.symbology, "Decoded frame");

        let detection = Detection {
            decoded,
            observed_at: Instant::now(),
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(detection) => {
                if sent.is_err() {
                    debug!("Detection receiver dropped");
                    break;
                }
            }
        }
    }

    decoder.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraBackend;
    use crate::decoder::{DecodeHints, DecoderFactory};
    use crate::fake::{ScriptedCamera, ScriptedDecoderFactory};
    use futures_util::StreamExt;

    async fn start(
        camera: &ScriptedCamera,
        decoders: &ScriptedDecoderFactory,
    ) -> (Arc<Mutex<StreamLease>>, DecodeLoopHandle, ReceiverStream<Detection>) {
        let stream = camera.acquire(&Default::default()).await.unwrap();
        let lease = Arc::new(Mutex::new(StreamLease::new(stream)));
        let decoder = decoders.create(&DecodeHints::default()).unwrap();
        let (handle, detections) = spawn(lease.clone(), decoder, DEFAULT_FRAME_INTERVAL);
        (lease, handle, detections)
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_detections_in_frame_order() {
        let camera = ScriptedCamera::timeline([(0, "ABC123"), (100, "XYZ999")]);
        let decoders = ScriptedDecoderFactory::new();
        let (_lease, handle, mut detections) = start(&camera, &decoders).await;

        let first = detections.next().await.unwrap();
        let second = detections.next().await.unwrap();
        assert_eq!(first.decoded.text, "ABC123");
        assert_eq!(second.decoded.text, "XYZ999");
        assert!(second.observed_at - first.observed_at >= Duration::from_millis(100));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_frames_do_not_stop_the_loop() {
        let camera = ScriptedCamera::timeline([(0, "!broken"), (50, "ABC123")]);
        let decoders = ScriptedDecoderFactory::new();
        let (_lease, handle, mut detections) = start(&camera, &decoders).await;

        assert_eq!(detections.next().await.unwrap().decoded.text, "ABC123");
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_resets_decoder() {
        let camera = ScriptedCamera::blank();
        let decoders = ScriptedDecoderFactory::new();
        let (_lease, handle, _detections) = start(&camera, &decoders).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown().await;

        assert_eq!(decoders.resets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_released_stream_ends_loop() {
        let camera = ScriptedCamera::blank();
        let decoders = ScriptedDecoderFactory::new();
        let (lease, handle, mut detections) = start(&camera, &decoders).await;

        lease.lock().unwrap().release();

        assert!(detections.next().await.is_none());
        handle.shutdown().await;
        assert_eq!(decoders.resets(), 1);
        assert_eq!(camera.live_tracks(), 0);
    }
}
