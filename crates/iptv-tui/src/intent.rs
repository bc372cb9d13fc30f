//! Pending-intent tracking for favorite toggles.
//!
//! Toggling a favorite only dispatches an intent to the store; membership
//! changes when the store replays the favorites list. During that window the
//! card's star is rendered as pending rather than flipped.
//!
//! # States (per channel URL)
//! ```text
//!  (absent)              — nothing in flight; render from the favorites set
//!  Pending { since }     — toggle sent, no replay yet; render pulsing
//!  TimedOut              — waited too long; render with warning colour + "?"
//! ```

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Timeout before a pending toggle becomes `TimedOut`.
pub const INTENT_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Waiting { since: Instant },
    TimedOut,
}

#[derive(Debug, Default)]
pub struct PendingFavorites {
    pending: HashMap<String, Pending>,
}

impl PendingFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a toggle that was just dispatched.
    pub fn mark(&mut self, url: &str) {
        self.mark_at(url, Instant::now());
    }

    pub fn mark_at(&mut self, url: &str, now: Instant) {
        self.pending
            .insert(url.to_string(), Pending::Waiting { since: now });
    }

    /// The store replayed the favorites list: everything in flight is settled.
    pub fn on_confirmed(&mut self) -> bool {
        let changed = !self.pending.is_empty();
        self.pending.clear();
        changed
    }

    pub fn is_pending(&self, url: &str) -> bool {
        matches!(self.pending.get(url), Some(Pending::Waiting { .. }))
    }

    pub fn is_timed_out(&self, url: &str) -> bool {
        matches!(self.pending.get(url), Some(Pending::TimedOut))
    }

    /// Called every tick to check for timeouts. Returns `true` if anything changed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for state in self.pending.values_mut() {
            if let Pending::Waiting { since } = *state {
                if now.saturating_duration_since(since) >= INTENT_TIMEOUT {
                    *state = Pending::TimedOut;
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn render_hint(&self, url: &str) -> RenderHint {
        self.render_hint_at(url, Instant::now())
    }

    pub fn render_hint_at(&self, url: &str, now: Instant) -> RenderHint {
        match self.pending.get(url) {
            None => RenderHint::Normal,
            Some(Pending::Waiting { since }) => {
                // Pulse on/off every 400ms
                let elapsed = now.saturating_duration_since(*since).as_millis();
                if (elapsed / 400) % 2 == 0 {
                    RenderHint::PendingVisible
                } else {
                    RenderHint::PendingHidden
                }
            }
            Some(Pending::TimedOut) => RenderHint::TimedOut,
        }
    }
}

/// How to render a star that may be pending confirmation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderHint {
    /// Render normally.
    Normal,
    /// Pending, show icon (pulse-on frame).
    PendingVisible,
    /// Pending, hide icon (pulse-off frame).
    PendingHidden,
    /// Timed out; render with warning colour and "?".
    TimedOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_then_confirm() {
        let mut p = PendingFavorites::new();
        p.mark("u1");
        assert!(p.is_pending("u1"));
        assert!(!p.is_pending("u2"));
        assert!(p.on_confirmed());
        assert!(!p.is_pending("u1"));
        assert!(!p.on_confirmed());
    }

    #[test]
    fn test_times_out_after_deadline() {
        let t0 = Instant::now();
        let mut p = PendingFavorites::new();
        p.mark_at("u1", t0);
        assert!(!p.tick_at(t0 + Duration::from_millis(2999)));
        assert!(p.tick_at(t0 + INTENT_TIMEOUT));
        assert!(p.is_timed_out("u1"));
        assert_eq!(p.render_hint_at("u1", t0), RenderHint::TimedOut);
        // Already timed out: no further change
        assert!(!p.tick_at(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_pulse_frames() {
        let t0 = Instant::now();
        let mut p = PendingFavorites::new();
        p.mark_at("u1", t0);
        assert_eq!(p.render_hint_at("u1", t0), RenderHint::PendingVisible);
        assert_eq!(
            p.render_hint_at("u1", t0 + Duration::from_millis(450)),
            RenderHint::PendingHidden
        );
        assert_eq!(p.render_hint_at("other", t0), RenderHint::Normal);
    }
}
