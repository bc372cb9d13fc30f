//! Active-channel tracking and the settle-delayed auto-scroll.
//!
//! ```text
//!  Idle ──(id)──▶ Tracking(id) ──(id')──▶ Tracking(id')
//!   ▲                  │
//!   └──(none / "")─────┘
//! ```
//!
//! Every emission carrying an id schedules a scroll, including a repeat of the
//! current id. Scrolls are never cancelled: each one recomputes its geometry
//! when it fires, so the last to land wins.

use std::time::Duration;

use iptv_proto::channel::Channel;
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Tracking(String),
}

#[derive(Debug, Default)]
pub struct ActiveChannelSync {
    state: SyncState,
}

impl ActiveChannelSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            SyncState::Idle => None,
            SyncState::Tracking(id) => Some(id),
        }
    }

    /// Feed one emission of the active-channel stream.
    /// Returns the id to scroll to once the layout has settled.
    pub fn observe(&mut self, active: Option<&Channel>) -> Option<String> {
        match active.and_then(Channel::id) {
            Some(id) => {
                self.state = SyncState::Tracking(id.to_string());
                Some(id.to_string())
            }
            None => {
                self.state = SyncState::Idle;
                None
            }
        }
    }
}

/// Fires a channel id back at the event loop after the settle delay.
#[derive(Clone)]
pub struct SettleTimer {
    delay: Duration,
    tx: mpsc::UnboundedSender<String>,
}

impl SettleTimer {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<String>) -> Self {
        Self { delay, tx }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fire-and-forget. A closed receiver just drops the id.
    pub fn schedule(&self, channel_id: String) {
        let tx = self.tx.clone();
        let delay = self.delay;
        trace!("settle timer: scroll to {} in {:?}", channel_id, delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(channel_id);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_id(id: &str) -> Channel {
        Channel {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_transitions() {
        let mut sync = ActiveChannelSync::new();
        assert_eq!(sync.state(), &SyncState::Idle);

        assert_eq!(sync.observe(Some(&with_id("a"))), Some("a".into()));
        assert_eq!(sync.active_id(), Some("a"));

        assert_eq!(sync.observe(Some(&with_id("b"))), Some("b".into()));
        assert_eq!(sync.state(), &SyncState::Tracking("b".into()));

        // Same id again still schedules
        assert_eq!(sync.observe(Some(&with_id("b"))), Some("b".into()));

        assert_eq!(sync.observe(None), None);
        assert_eq!(sync.state(), &SyncState::Idle);
    }

    #[test]
    fn test_empty_or_missing_id_goes_idle() {
        let mut sync = ActiveChannelSync::new();
        sync.observe(Some(&with_id("a")));
        assert_eq!(sync.observe(Some(&with_id(""))), None);
        assert_eq!(sync.active_id(), None);

        sync.observe(Some(&with_id("a")));
        let no_id = Channel {
            url: Some("http://x".into()),
            ..Default::default()
        };
        assert_eq!(sync.observe(Some(&no_id)), None);
        assert_eq!(sync.state(), &SyncState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_timer_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = SettleTimer::new(Duration::from_millis(100), tx);
        timer.schedule("ch42".into());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("ch42"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_schedules_all_fire_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = SettleTimer::new(Duration::from_millis(100), tx);
        timer.schedule("a".into());
        tokio::time::sleep(Duration::from_millis(30)).await;
        timer.schedule("b".into());

        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert_eq!(rx.recv().await.as_deref(), Some("b"));
    }
}
