//! Action enum — all user-initiated intents and internal events.

use std::time::Duration;

use iptv_proto::store::StoreIntent;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    SearchBar,
    ChannelGrid,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Outbound ─────────────────────────────────────────────────────────────
    /// Send an intent to the store.
    Dispatch(StoreIntent),
    /// Ask the program guide for this channel name's schedule.
    FetchPrograms(String),
    /// Show a translated toast for `duration`.
    Notify {
        key: &'static str,
        duration: Duration,
    },

    // ── Search ───────────────────────────────────────────────────────────────
    SearchChanged(String),
    ClearSearch,

    // ── Focus ────────────────────────────────────────────────────────────────
    FocusSearch,
    FocusGrid,
    FocusNext,
    FocusPrev,

    // ── Scrolling ────────────────────────────────────────────────────────────
    /// Scroll to this channel id once the layout has settled.
    ScheduleScroll(String),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Noop,
}
