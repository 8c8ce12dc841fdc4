//! # Scan Lifecycle
//!
//! State machine for one scanning session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scan Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐   Start    ┌──────────────────────┐  Granted  ┌─────────┐│
//! │  │   Idle   │──────────► │ RequestingPermission │─────────► │Streaming││
//! │  └──────────┘            └──────────┬───────────┘           └────┬────┘│
//! │       ▲                             │                            │     │
//! │       │          Failed / Stop      │          Failed / Stop     │     │
//! │       └─────────────────────────────┴────────────────────────────┘     │
//! │                                                                         │
//! │  • Errors always land in Idle with a classified notice                 │
//! │  • Nothing is retried: the operator must Start again                   │
//! │  • Stop in Idle is a no-op (teardown is always safe)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Phase of a scanning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    /// No camera held.
    #[default]
    Idle,
    /// Waiting for the camera permission / device.
    RequestingPermission,
    /// Camera live, decode loop running.
    Streaming,
}

/// Inputs that drive the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    /// Operator asked to start scanning.
    Start,
    /// The camera stream was obtained and bound.
    Granted,
    /// Acquisition or decoder setup failed.
    Failed,
    /// Explicit stop or teardown.
    Stop,
}

impl ScanPhase {
    /// Applies `action`, returning the next phase.
    pub fn apply(self, action: ScanAction) -> CoreResult<ScanPhase> {
        use ScanAction::*;
        use ScanPhase::*;

        match (self, action) {
            (Idle, Start) => Ok(RequestingPermission),
            (RequestingPermission, Granted) => Ok(Streaming),
            (RequestingPermission | Streaming, Failed) => Ok(Idle),
            (_, Stop) => Ok(Idle),
            (from, action) => Err(CoreError::InvalidTransition { from, action }),
        }
    }

    /// True while a camera is requested or held.
    pub fn is_active(&self) -> bool {
        !matches!(self, ScanPhase::Idle)
    }
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPhase::Idle => write!(f, "idle"),
            ScanPhase::RequestingPermission => write!(f, "requesting_permission"),
            ScanPhase::Streaming => write!(f, "streaming"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let phase = ScanPhase::Idle
            .apply(ScanAction::Start)
            .and_then(|p| p.apply(ScanAction::Granted))
            .unwrap();
        assert_eq!(phase, ScanPhase::Streaming);
        assert_eq!(phase.apply(ScanAction::Stop).unwrap(), ScanPhase::Idle);
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let requesting = ScanPhase::Idle.apply(ScanAction::Start).unwrap();
        assert_eq!(requesting.apply(ScanAction::Failed).unwrap(), ScanPhase::Idle);
        assert_eq!(
            ScanPhase::Streaming.apply(ScanAction::Failed).unwrap(),
            ScanPhase::Idle
        );
    }

    #[test]
    fn test_stop_is_always_allowed() {
        for phase in [
            ScanPhase::Idle,
            ScanPhase::RequestingPermission,
            ScanPhase::Streaming,
        ] {
            assert_eq!(phase.apply(ScanAction::Stop).unwrap(), ScanPhase::Idle);
        }
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(ScanPhase::Streaming.apply(ScanAction::Start).is_err());
        assert!(ScanPhase::RequestingPermission.apply(ScanAction::Start).is_err());
        assert!(ScanPhase::Idle.apply(ScanAction::Granted).is_err());
        assert!(ScanPhase::Idle.apply(ScanAction::Failed).is_err());
        assert!(ScanPhase::Streaming.apply(ScanAction::Granted).is_err());
    }

    #[test]
    fn test_is_active() {
        assert!(!ScanPhase::Idle.is_active());
        assert!(ScanPhase::RequestingPermission.is_active());
        assert!(ScanPhase::Streaming.is_active());
    }
}
