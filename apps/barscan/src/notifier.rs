//! # Notifier
//!
//! Where toasts go. Commands report every operator-visible outcome as a
//! [`Notice`]; the notifier decides how it is shown.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Notice Delivery                                      │
//! │                                                                         │
//! │  commands/*  ──notify(Notice)──►  dyn Notifier                          │
//! │                                      │                                  │
//! │  ScanSession ──emit_error()──► SessionNotices ──┘                       │
//! │                                      │                                  │
//! │                       ┌──────────────┴──────────────┐                   │
//! │                       ▼                             ▼                   │
//! │              TerminalNotifier              RecordingNotifier            │
//! │              "✔ Scan thành công: ABC123"   Vec<Notice> (tests)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use barscan_capture::{CaptureError, ScanEventEmitter};
use barscan_core::{Locale, Notice, ScanEvent, ScanPhase, Severity};
use tracing::{debug, trace};

/// Shows notices to the operator.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

// =============================================================================
// Terminal Notifier
// =============================================================================

/// Prints localized notices to stderr, one per line.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    locale: Locale,
}

impl TerminalNotifier {
    pub fn new(locale: Locale) -> Self {
        TerminalNotifier { locale }
    }

    /// The line printed for `notice`.
    pub fn render(&self, notice: &Notice) -> String {
        let marker = match notice.severity() {
            Severity::Success => "✔",
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
            Severity::Error => "✖",
        };
        format!("{} {}", marker, notice.text(self.locale))
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        let line = self.render(notice);
        // A closed stderr is not worth failing a scan over.
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }
}

// =============================================================================
// Recording Notifier
// =============================================================================

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}

// =============================================================================
// Session Adapter
// =============================================================================

/// Turns session events into notices.
///
/// Only failures become toasts here; accepted scans are announced by the
/// scan command once they are in the result store.
pub struct SessionNotices {
    notifier: Arc<dyn Notifier>,
}

impl SessionNotices {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        SessionNotices { notifier }
    }
}

impl ScanEventEmitter for SessionNotices {
    fn emit_phase(&self, phase: ScanPhase) {
        debug!(%phase, "Scan phase changed");
    }

    fn emit_scan(&self, event: &ScanEvent) {
        trace!(barcode = %event.barcode(), "Session accepted scan");
    }

    fn emit_error(&self, error: &CaptureError) {
        self.notifier.notify(&error.notice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_rendering_is_localized() {
        let notice = Notice::ScanSuccess {
            code: "ABC123".into(),
        };
        assert_eq!(
            TerminalNotifier::new(Locale::Vi).render(&notice),
            "✔ Scan thành công: ABC123"
        );
        assert!(TerminalNotifier::new(Locale::En)
            .render(&Notice::ExportEmpty)
            .starts_with('⚠'));
    }

    #[test]
    fn test_session_errors_become_notices() {
        let recorder = Arc::new(RecordingNotifier::new());
        let adapter = SessionNotices::new(recorder.clone());

        adapter.emit_phase(ScanPhase::Streaming);
        adapter.emit_error(&CaptureError::PermissionDenied);

        assert_eq!(recorder.notices(), vec![Notice::PermissionDenied]);
    }
}
