//! # Scan Session
//!
//! Orchestrates one camera, one decoder, the dedup gate and the lifecycle.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ScanSession                                      │
//! │                                                                         │
//! │  start()                                                                │
//! │    Idle ──► RequestingPermission                                        │
//! │      camera.acquire(constraints) ──► StreamLease                        │
//! │      decoders.create(hints)      ──► Box<dyn FrameDecoder>              │
//! │      decode_loop::spawn(lease, decoder)                                 │
//! │    ──► Streaming                                                        │
//! │                                                                         │
//! │  next_event()                                                           │
//! │    Detection ──► validate_barcode ──► invalid? ──► logged, skipped      │
//! │              ──► DedupGate::offer ──► Accepted? ──► ScanEvent           │
//! │                                  └──► Suppressed (dropped)              │
//! │                   DedupTimer::arm(generation, deadline)                 │
//! │                                                                         │
//! │  stop() / drop                                                          │
//! │    cancel loop ──► decoder reset ──► lease.release() ──► timer cancel   │
//! │    ──► Idle                                                             │
//! │                                                                         │
//! │  Any failure during start() releases what was acquired and lands in    │
//! │  Idle with the error reported through the emitter.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use barscan_core::validation::validate_barcode;
use barscan_core::{
    DedupGate, Locale, Offer, ScanAction, ScanEvent, ScanPhase, DEFAULT_SUPPRESSION_WINDOW_MS,
};
use futures_util::{Stream, StreamExt};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, trace, warn};

use crate::camera::{CameraBackend, CameraConstraints, StreamLease};
use crate::decode_loop::{self, DecodeLoopHandle, Detection, DEFAULT_FRAME_INTERVAL};
use crate::decoder::{DecodeHints, DecoderFactory};
use crate::dedup_timer::DedupTimer;
use crate::error::{CaptureError, CaptureResult};

// =============================================================================
// Session Configuration
// =============================================================================

/// Everything a session needs to know before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub constraints: CameraConstraints,
    pub hints: DecodeHints,
    pub suppression_window: Duration,
    pub frame_interval: Duration,
    pub locale: Locale,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            constraints: CameraConstraints::default(),
            hints: DecodeHints::default(),
            suppression_window: Duration::from_millis(DEFAULT_SUPPRESSION_WINDOW_MS),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            locale: Locale::default(),
        }
    }
}

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives session events (implemented by the app's notifier).
pub trait ScanEventEmitter: Send + Sync {
    /// The lifecycle moved to `phase`.
    fn emit_phase(&self, phase: ScanPhase);

    /// A scan passed the dedup gate.
    fn emit_scan(&self, event: &ScanEvent);

    /// A terminal error ended the attempt.
    fn emit_error(&self, error: &CaptureError);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl ScanEventEmitter for NoOpEmitter {
    fn emit_phase(&self, _phase: ScanPhase) {}
    fn emit_scan(&self, _event: &ScanEvent) {}
    fn emit_error(&self, _error: &CaptureError) {}
}

// =============================================================================
// Scan Session
// =============================================================================

/// Resources held while streaming. Dropping this releases all of them.
struct Active {
    lease: Arc<Mutex<StreamLease>>,
    decode_loop: DecodeLoopHandle,
    detections: ReceiverStream<Detection>,
}

/// A camera scanning session.
pub struct ScanSession {
    config: SessionConfig,
    camera: Arc<dyn CameraBackend>,
    decoders: Arc<dyn DecoderFactory>,
    emitter: Arc<dyn ScanEventEmitter>,

    phase: ScanPhase,
    active: Option<Active>,
    gate: Arc<Mutex<DedupGate>>,
    timer: DedupTimer,
}

impl ScanSession {
    /// Creates an idle session.
    pub fn new(
        config: SessionConfig,
        camera: Arc<dyn CameraBackend>,
        decoders: Arc<dyn DecoderFactory>,
    ) -> Self {
        Self::with_emitter(config, camera, decoders, Arc::new(NoOpEmitter))
    }

    /// Creates an idle session with a custom event emitter.
    pub fn with_emitter(
        config: SessionConfig,
        camera: Arc<dyn CameraBackend>,
        decoders: Arc<dyn DecoderFactory>,
        emitter: Arc<dyn ScanEventEmitter>,
    ) -> Self {
        let gate = DedupGate::new(config.suppression_window);
        ScanSession {
            config,
            camera,
            decoders,
            emitter,
            phase: ScanPhase::Idle,
            active: None,
            gate: Arc::new(Mutex::new(gate)),
            timer: DedupTimer::new(),
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == ScanPhase::Streaming
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The value currently suppressing repeats, if any.
    pub fn suppressing(&self) -> Option<String> {
        self.gate
            .lock()
            .ok()
            .and_then(|gate| gate.last_value().map(str::to_string))
    }

    /// Acquires the camera, builds the decoder and starts the decode loop.
    ///
    /// ## Errors
    /// - `InvalidTransition` if the session is not idle (session untouched)
    /// - any acquisition or decoder error (session back in Idle)
    pub async fn start(&mut self) -> CaptureResult<()> {
        self.transition(ScanAction::Start)?;
        info!(camera = self.camera.name(), "Starting scan session");

        match self.open().await {
            Ok(active) => {
                self.active = Some(active);
                self.transition(ScanAction::Granted)?;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Scan session failed to start");
                self.transition(ScanAction::Failed)?;
                self.emitter.emit_error(&err);
                Err(err)
            }
        }
    }

    async fn open(&self) -> CaptureResult<Active> {
        let stream = self.camera.acquire(&self.config.constraints).await?;
        let lease = Arc::new(Mutex::new(StreamLease::new(stream)));

        // On failure `lease` drops here and stops the tracks.
        let decoder = self.decoders.create(&self.config.hints)?;

        let (decode_loop, detections) =
            decode_loop::spawn(lease.clone(), decoder, self.config.frame_interval);

        Ok(Active {
            lease,
            decode_loop,
            detections,
        })
    }

    /// Stops scanning and releases camera and decoder. Idle sessions are
    /// left as they are.
    pub async fn stop(&mut self) -> CaptureResult<()> {
        if self.phase == ScanPhase::Idle {
            return Ok(());
        }

        if let Some(active) = self.active.take() {
            active.decode_loop.shutdown().await;
            release(&active.lease);
        }
        self.timer.cancel();
        if let Ok(mut gate) = self.gate.lock() {
            gate.reset();
        }

        self.transition(ScanAction::Stop)?;
        info!("Scan session stopped");
        Ok(())
    }

    /// Waits for the next accepted scan.
    ///
    /// Returns `Ok(None)` when the camera stream ends; the session is
    /// stopped in that case.
    ///
    /// ## Errors
    /// `NotScanning` unless streaming.
    pub async fn next_event(&mut self) -> CaptureResult<Option<ScanEvent>> {
        loop {
            let active = match (&self.phase, self.active.as_mut()) {
                (ScanPhase::Streaming, Some(active)) => active,
                _ => return Err(CaptureError::NotScanning),
            };

            let next = active.detections.next().await;
            let Some(detection) = next else {
                debug!("Decode loop finished");
                self.stop().await?;
                return Ok(None);
            };

            if let Some(event) = self.admit(detection)? {
                return Ok(Some(event));
            }
        }
    }

    /// Runs a detection through the dedup gate.
    ///
    /// Text that is not a valid barcode is skipped before it reaches the
    /// gate, so it neither suppresses nor ends the session.
    fn admit(&mut self, detection: Detection) -> CaptureResult<Option<ScanEvent>> {
        let text = detection.decoded.text.as_str();

        if let Err(err) = validate_barcode(text) {
            warn!(
                error = %err,
                format = %detection.decoded.symbology,
                len = text.chars().count(),
                "Skipping invalid decoded value"
            );
            return Ok(None);
        }

        let offer = match self.gate.lock() {
            Ok(mut gate) => gate.offer(text, detection.observed_at.into_std()),
            Err(_) => return Err(CaptureError::Camera("dedup gate poisoned".to_string())),
        };

        match offer {
            Offer::Suppressed { remaining } => {
                trace!(barcode = %text, ?remaining, "Suppressed repeat scan");
                Ok(None)
            }
            Offer::Accepted {
                generation,
                expires_at,
            } => {
                self.timer.arm(
                    self.gate.clone(),
                    generation,
                    tokio::time::Instant::from_std(expires_at),
                );

                let event = ScanEvent::from_decoded(detection.decoded, self.config.locale)?;
                info!(barcode = %event.barcode(), format = %event.format(), "Scan accepted");
                self.emitter.emit_scan(&event);
                Ok(Some(event))
            }
        }
    }

    /// Single-shot capture: start, return the first accepted code, stop.
    ///
    /// Camera and decoder are released whatever the outcome.
    ///
    /// ## Errors
    /// - any [`start`](Self::start) error
    /// - `Timeout` if nothing was scanned within `timeout`
    /// - `ChannelClosed` if the stream ended first
    pub async fn scan_once(&mut self, timeout: Duration) -> CaptureResult<ScanEvent> {
        self.start().await?;

        let outcome = tokio::time::timeout(timeout, self.next_event()).await;
        self.stop().await?;

        match outcome {
            Ok(Ok(Some(event))) => Ok(event),
            Ok(Ok(None)) => Err(CaptureError::ChannelClosed),
            Ok(Err(err)) => Err(err),
            Err(_) => {
                let err = CaptureError::Timeout(timeout.as_millis() as u64);
                self.emitter.emit_error(&err);
                Err(err)
            }
        }
    }

    /// Turns this session into a stream of accepted scans. The stream ends
    /// when the camera stream does; dropping it releases everything.
    pub fn into_events(self) -> impl Stream<Item = ScanEvent> + Send {
        futures_util::stream::unfold(self, |mut session| async move {
            match session.next_event().await {
                Ok(Some(event)) => Some((event, session)),
                Ok(None) => None,
                Err(err) => {
                    debug!(error = %err, "Scan event stream closed");
                    None
                }
            }
        })
    }

    fn transition(&mut self, action: ScanAction) -> CaptureResult<()> {
        let next = self.phase.apply(action)?;
        if next != self.phase {
            debug!(from = %self.phase, to = %next, ?action, "Scan phase changed");
            self.phase = next;
            self.emitter.emit_phase(next);
        }
        Ok(())
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.decode_loop.cancel();
            release(&active.lease);
            debug!("Scan session dropped while active");
        }
        self.timer.cancel();
    }
}

fn release(lease: &Mutex<StreamLease>) {
    match lease.lock() {
        Ok(mut lease) => {
            lease.release();
        }
        Err(poisoned) => {
            poisoned.into_inner().release();
        }
    }
}
