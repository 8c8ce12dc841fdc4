//! # barscan-capture: Capture Pipeline for Barscan
//!
//! Turns a camera into a stream of accepted [`ScanEvent`](barscan_core::ScanEvent)s.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Capture Pipeline                                 │
//! │                                                                         │
//! │  ┌──────────────────┐    ┌──────────────────┐    ┌──────────────────┐  │
//! │  │  CameraBackend   │    │  DecodeLoop      │    │  ScanSession     │  │
//! │  │                  │    │  (tokio task)    │    │                  │  │
//! │  │  ImageDirCamera  │───►│  grab frame      │───►│  DedupGate       │  │
//! │  │  ScriptedCamera  │    │  FrameDecoder    │    │  DedupTimer      │  │
//! │  │                  │    │  yield 16ms      │    │  ScanPhase       │  │
//! │  └──────────────────┘    └──────────────────┘    └────────┬─────────┘  │
//! │        StreamLease         Stream<Detection>               │            │
//! │                                                            ▼            │
//! │                                                   ScanEventEmitter      │
//! │                                                   next_event()          │
//! │                                                                         │
//! │  RESOURCE RULES:                                                        │
//! │  • One StreamLease per acquisition, released exactly once              │
//! │  • One decoder per session, reset on stop                              │
//! │  • At most one pending dedup expiry                                    │
//! │  • Dropping a session releases everything synchronously                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`camera`] - Backend traits, frames, stream lease
//! - [`image_dir`] - Directory-of-images camera
//! - [`decoder`] - Decoder adapter traits and hints
//! - [`decode_loop`] - Cancelable frame polling task
//! - [`dedup_timer`] - Eager suppression-window expiry
//! - [`session`] - `ScanSession` orchestrator
//! - [`fake`] - Scripted camera and decoder
//! - [`error`] - Capture error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use barscan_capture::{ImageDirCamera, RxingDecoderFactory, ScanSession, SessionConfig};
//!
//! let mut session = ScanSession::new(
//!     SessionConfig::default(),
//!     Arc::new(ImageDirCamera::new("/var/spool/frames")),
//!     Arc::new(RxingDecoderFactory),
//! );
//!
//! session.start().await?;
//! while let Some(event) = session.next_event().await? {
//!     println!("{} ({})", event.barcode(), event.format());
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod camera;
pub mod decode_loop;
pub mod decoder;
pub mod dedup_timer;
pub mod error;
pub mod fake;
pub mod image_dir;
pub mod session;

#[cfg(feature = "rxing")]
pub mod rxing_decoder;

// =============================================================================
// Re-exports
// =============================================================================

pub use camera::{CameraBackend, CameraConstraints, FacingMode, Frame, MediaStream, StreamLease};
pub use decode_loop::{DecodeLoopHandle, Detection, DEFAULT_FRAME_INTERVAL};
pub use decoder::{DecodeError, DecodeHints, DecoderFactory, FrameDecoder};
pub use dedup_timer::DedupTimer;
pub use error::{CaptureError, CaptureResult};
pub use image_dir::ImageDirCamera;
pub use session::{NoOpEmitter, ScanEventEmitter, ScanSession, SessionConfig};

#[cfg(feature = "rxing")]
pub use rxing_decoder::{RxingDecoder, RxingDecoderFactory};
