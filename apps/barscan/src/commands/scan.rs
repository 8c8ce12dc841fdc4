//! # Scan Commands
//!
//! Streaming scan: every accepted code goes into the result list.
//!
//! ## Scan Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scan Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  start   ┌──────────────┐ granted ┌───────────┐           │
//! │  │   Idle   │─────────►│  Requesting  │────────►│ Streaming │           │
//! │  │          │          │  Permission  │         │           │           │
//! │  └──────────┘          └──────┬───────┘         └─────┬─────┘           │
//! │       ▲                       │ failed                │                 │
//! │       │                       ▼                       │                 │
//! │       └──────── error notice, camera released         │                 │
//! │       │                                               │                 │
//! │       └──── stop: Ctrl-C │ duration elapsed │ stream ended             │
//! │                                                                         │
//! │  while Streaming: next_event() ──► ResultsState::record ──► toast      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use barscan_core::Statistics;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::notifier::{Notifier, SessionNotices};
use crate::state::{ConfigState, DeviceState, ResultsState};

/// Why a scan run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanEnd {
    /// The operator stopped it.
    Cancelled,
    /// The requested duration elapsed.
    Elapsed,
    /// The camera stream ended on its own.
    StreamEnded,
}

/// Outcome of one scan run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Codes accepted during this run.
    pub accepted: usize,
    /// Counters over the whole result list.
    pub statistics: Statistics,
    pub ended: ScanEnd,
}

/// Scans until `cancel` fires, `duration` elapses, or the stream ends.
///
/// The camera and decoder are released before this returns, also on error.
///
/// ## Errors
/// Acquisition and decoder failures. Their notices were already shown.
pub async fn scan(
    results: &ResultsState,
    config: &ConfigState,
    devices: &DeviceState,
    notifier: Arc<dyn Notifier>,
    duration: Option<Duration>,
    cancel: CancellationToken,
) -> Result<ScanReport, ApiError> {
    let emitter = Arc::new(SessionNotices::new(notifier.clone()));
    let mut session = devices.session(config.session_config(), emitter);

    info!(camera = devices.camera_name(), ?duration, "Starting scan");
    session.start().await?;

    let deadline = duration.map(|d| Instant::now() + d);
    let mut accepted = 0;

    let ended = loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break ScanEnd::Cancelled,
            _ = until(deadline) => break ScanEnd::Elapsed,
            next = session.next_event() => next,
        };

        match next {
            Ok(Some(event)) => {
                results.record(event, notifier.as_ref())?;
                accepted += 1;
            }
            Ok(None) => break ScanEnd::StreamEnded,
            Err(e) => {
                session.stop().await?;
                return Err(e.into());
            }
        }
    };

    session.stop().await?;
    debug!(?ended, accepted, "Scan finished");

    Ok(ScanReport {
        accepted,
        statistics: results.statistics(),
        ended,
    })
}

/// Completes at `deadline`, or never.
async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::notifier::RecordingNotifier;
    use barscan_capture::fake::{ScriptedCamera, ScriptedDecoderFactory};
    use barscan_capture::CaptureError;
    use barscan_core::Notice;

    fn devices(camera: &ScriptedCamera, decoders: &ScriptedDecoderFactory) -> DeviceState {
        DeviceState::new(Arc::new(camera.clone()), Arc::new(decoders.clone()))
    }

    fn scan_successes(notices: &[Notice]) -> Vec<&str> {
        notices
            .iter()
            .filter_map(|n| match n {
                Notice::ScanSuccess { code } => Some(code.as_str()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeats_inside_window_are_not_recorded() {
        let camera = ScriptedCamera::timeline([
            (0, "ABC123"),
            (500, "ABC123"),
            (1500, "ABC123"),
            (1600, "XYZ999"),
        ])
        .ending();
        let decoders = ScriptedDecoderFactory::new();
        let results = ResultsState::new();
        let notifier = Arc::new(RecordingNotifier::new());

        let report = scan(
            &results,
            &ConfigState::default(),
            &devices(&camera, &decoders),
            notifier.clone(),
            None,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.ended, ScanEnd::StreamEnded);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.statistics, Statistics { total: 3, unique: 2 });
        assert_eq!(
            scan_successes(&notifier.notices()),
            vec!["ABC123", "ABC123", "XYZ999"]
        );
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(decoders.resets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_bounds_the_run() {
        let camera = ScriptedCamera::timeline([(100, "ABC123"), (5000, "LATE")]);
        let decoders = ScriptedDecoderFactory::new();
        let results = ResultsState::new();

        let report = scan(
            &results,
            &ConfigState::default(),
            &devices(&camera, &decoders),
            Arc::new(RecordingNotifier::new()),
            Some(Duration::from_secs(2)),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.ended, ScanEnd::Elapsed);
        assert_eq!(report.accepted, 1);
        assert_eq!(results.with_store(|s| s.count_of("LATE")), 0);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_and_releases() {
        let camera = ScriptedCamera::blank();
        let decoders = ScriptedDecoderFactory::new();
        let cancel = CancellationToken::new();

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                cancel.cancel();
            })
        };

        let report = scan(
            &ResultsState::new(),
            &ConfigState::default(),
            &devices(&camera, &decoders),
            Arc::new(RecordingNotifier::new()),
            None,
            cancel,
        )
        .await
        .unwrap();
        canceller.await.unwrap();

        assert_eq!(report.ended, ScanEnd::Cancelled);
        assert_eq!(report.accepted, 0);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test]
    async fn test_permission_denied_is_reported_once() {
        let camera = ScriptedCamera::failing(CaptureError::PermissionDenied);
        let decoders = ScriptedDecoderFactory::new();
        let notifier = Arc::new(RecordingNotifier::new());

        let err = scan(
            &ResultsState::new(),
            &ConfigState::default(),
            &devices(&camera, &decoders),
            notifier.clone(),
            None,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(notifier.notices(), vec![Notice::PermissionDenied]);
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(decoders.created(), 0);
    }

    #[tokio::test]
    async fn test_decoder_failure_releases_camera() {
        let camera = ScriptedCamera::blank();
        let decoders = ScriptedDecoderFactory::failing("no wasm");
        let notifier = Arc::new(RecordingNotifier::new());

        let err = scan(
            &ResultsState::new(),
            &ConfigState::default(),
            &devices(&camera, &decoders),
            notifier.clone(),
            None,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::CameraError);
        assert_eq!(notifier.notices(), vec![Notice::DecoderInit]);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_decode_does_not_end_the_run() {
        let camera = ScriptedCamera::timeline([(0, " "), (100, "ABC123")]).ending();
        let decoders = ScriptedDecoderFactory::new();
        let results = ResultsState::new();
        let notifier = Arc::new(RecordingNotifier::new());

        let report = scan(
            &results,
            &ConfigState::default(),
            &devices(&camera, &decoders),
            notifier.clone(),
            None,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.ended, ScanEnd::StreamEnded);
        assert_eq!(report.accepted, 1);
        assert_eq!(results.with_store(|s| s.count_of("ABC123")), 1);
        assert_eq!(scan_successes(&notifier.notices()), vec!["ABC123"]);
        assert_eq!(camera.live_tracks(), 0);
    }
}
