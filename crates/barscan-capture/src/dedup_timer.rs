//! Eager expiry for the dedup gate.
//!
//! The gate already expires lazily on the next offer; this timer clears it
//! at the deadline so `last_value()` reflects reality while the camera sees
//! nothing. At most one expiry is pending: arming again cancels the previous
//! one, and the generation check in [`DedupGate::expire`] covers the race
//! where an old timer fires just as a new value is accepted.

use std::sync::{Arc, Mutex};

use barscan_core::DedupGate;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// The single pending expiry of a session's dedup gate.
#[derive(Debug, Default)]
pub struct DedupTimer {
    pending: Option<(CancellationToken, JoinHandle<()>)>,
}

impl DedupTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `gate.expire(generation)` at `deadline`, replacing any
    /// pending expiry.
    pub fn arm(&mut self, gate: Arc<Mutex<DedupGate>>, generation: u64, deadline: Instant) {
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    if let Ok(mut gate) = gate.lock() {
                        if gate.expire(generation) {
                            trace!(generation, "Suppression window elapsed");
                        }
                    }
                }
            }
        });

        self.pending = Some((token, join));
    }

    /// Drops the pending expiry, if any.
    pub fn cancel(&mut self) {
        if let Some((token, join)) = self.pending.take() {
            token.cancel();
            join.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .map(|(_, join)| !join.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for DedupTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
