//! # Dedup Gate
//!
//! Debounces identical consecutive decodes.
//!
//! ## Behavior
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dedup Gate (window = 1000ms)                         │
//! │                                                                         │
//! │  t=0     ABC123 ──► ACCEPT   last = ABC123, expires t=1000             │
//! │  t=500   ABC123 ──► SUPPRESS (same value, window open)                 │
//! │  t=1500  ABC123 ──► ACCEPT   last = ABC123, expires t=2500             │
//! │  t=1600  XYZ999 ──► ACCEPT   last = XYZ999, expires t=2600             │
//! │                                                                         │
//! │  Only the MOST RECENT accepted value is remembered. This is a          │
//! │  debounce, not a dedup set: ABC123 → XYZ999 → ABC123 accepts all 3.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Expiry
//! The window is measured from the acceptance, and suppressed offers never
//! extend it. Expiry happens lazily (the next `offer` compares against the
//! deadline) or eagerly through [`DedupGate::expire`], which a timer calls
//! with the generation it was armed for. A timer armed for an older
//! acceptance cannot clear a newer one.

use std::time::{Duration, Instant};

/// Outcome of offering a decoded value to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// The value is new (or its window elapsed). Arm expiry for `expires_at`.
    Accepted { generation: u64, expires_at: Instant },

    /// Same value as the last acceptance, still inside the window.
    Suppressed { remaining: Duration },
}

impl Offer {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Offer::Accepted { .. })
    }
}

#[derive(Debug, Clone)]
struct LastAccepted {
    value: String,
    expires_at: Instant,
    generation: u64,
}

/// Suppresses a value that repeats the last accepted one within the window.
#[derive(Debug, Clone)]
pub struct DedupGate {
    window: Duration,
    last: Option<LastAccepted>,
    generation: u64,
}

impl DedupGate {
    /// Creates a gate with the given suppression window.
    pub fn new(window: Duration) -> Self {
        DedupGate {
            window,
            last: None,
            generation: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Offers a decoded value observed at `now`.
    pub fn offer(&mut self, value: &str, now: Instant) -> Offer {
        if let Some(last) = &self.last {
            if last.value == value && now < last.expires_at {
                return Offer::Suppressed {
                    remaining: last.expires_at - now,
                };
            }
        }

        self.generation += 1;
        let expires_at = now + self.window;
        self.last = Some(LastAccepted {
            value: value.to_string(),
            expires_at,
            generation: self.generation,
        });

        Offer::Accepted {
            generation: self.generation,
            expires_at,
        }
    }

    /// Clears the remembered value if it still belongs to `generation`.
    ///
    /// Returns true when something was cleared.
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.last {
            Some(last) if last.generation == generation => {
                self.last = None;
                true
            }
            _ => false,
        }
    }

    /// Clears the remembered value if its window has elapsed at `now`.
    pub fn expire_due(&mut self, now: Instant) -> bool {
        match &self.last {
            Some(last) if now >= last.expires_at => {
                self.last = None;
                true
            }
            _ => false,
        }
    }

    /// Forgets the remembered value unconditionally (stop / teardown).
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// The value currently suppressing repeats, if any.
    pub fn last_value(&self) -> Option<&str> {
        self.last.as_ref().map(|l| l.value.as_str())
    }
}

impl Default for DedupGate {
    fn default() -> Self {
        DedupGate::new(Duration::from_millis(crate::DEFAULT_SUPPRESSION_WINDOW_MS))
    }
}
