//! View state behind the channel grid.
//!
//! Owns the filtered projection of the channel list, the favorites mirror and
//! the active/selected channel ids. It never talks to the store or the guide
//! directly: every outbound effect comes back as an `Action` for the App to
//! dispatch, the same way components hand actions up.

use std::time::Duration;

use iptv_proto::channel::Channel;
use iptv_proto::store::StoreIntent;
use ratatui::crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::action::Action;
use crate::favorites::FavoritesCache;
use crate::filter::apply_filter;
use crate::intent::{PendingFavorites, RenderHint};
use crate::sync::ActiveChannelSync;
use crate::ui_event::{KeyUiEvent, UiEvent};

/// Translation key of the toast shown after a favorite toggle.
pub const FAVORITES_UPDATED: &str = "CHANNELS.FAVORITES_UPDATED";

pub struct GridView {
    channels: Vec<Channel>,
    filtered: Vec<Channel>,
    search_term: String,
    favorites: FavoritesCache,
    pending: PendingFavorites,
    sync: ActiveChannelSync,
    selected_id: Option<String>,
    toast_duration: Duration,
    detached: bool,
}

impl GridView {
    pub fn new(toast_duration: Duration) -> Self {
        Self {
            channels: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            favorites: FavoritesCache::new(),
            pending: PendingFavorites::new(),
            sync: ActiveChannelSync::new(),
            selected_id: None,
            toast_duration,
            detached: false,
        }
    }

    // ── Channel list & search ────────────────────────────────────────────────

    /// Replace the source list. `None` counts as empty.
    pub fn set_channel_list(&mut self, channels: Option<Vec<Channel>>) {
        self.channels = channels.unwrap_or_default();
        self.apply_filter();
    }

    pub fn channel_list(&self) -> &[Channel] {
        &self.channels
    }

    pub fn filtered(&self) -> &[Channel] {
        &self.filtered
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn apply_filter(&mut self) {
        self.filtered = apply_filter(&self.channels, &self.search_term);
    }

    pub fn on_search_change(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.apply_filter();
    }

    /// Empty the search term and refocus the search box.
    /// Nothing happens when the term is already empty.
    pub fn clear_search(&mut self) -> Vec<Action> {
        if self.search_term.is_empty() {
            return vec![];
        }
        self.search_term.clear();
        self.apply_filter();
        vec![Action::FocusSearch]
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn select_channel(&mut self, channel: Option<&Channel>) -> Vec<Action> {
        let Some(channel) = channel else {
            return vec![];
        };
        self.selected_id = channel.id.clone();
        debug!("grid: select {}", channel.display_name());

        let mut actions = vec![Action::Dispatch(StoreIntent::SetActiveChannel(
            channel.clone(),
        ))];
        if let Some(name) = channel.name().map(str::trim).filter(|n| !n.is_empty()) {
            actions.push(Action::FetchPrograms(name.to_string()));
        }
        actions
    }

    /// Enter and Space on a card select it; every other key is left alone.
    pub fn on_card_key_down(&mut self, event: &mut KeyUiEvent, channel: Option<&Channel>) -> Vec<Action> {
        if event.inner.kind == KeyEventKind::Release {
            return vec![];
        }
        match event.inner.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                event.prevent_default();
                self.select_channel(channel)
            }
            _ => vec![],
        }
    }

    pub fn selected_channel_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    // ── Favorites ────────────────────────────────────────────────────────────

    /// Ask the store to flip `channel`'s favorite flag. The event is swallowed
    /// so the enclosing card doesn't also treat it as a selection.
    pub fn toggle_favorite<E>(&mut self, channel: &Channel, event: &mut UiEvent<E>) -> Vec<Action> {
        event.stop_propagation();
        if let Some(url) = channel.url() {
            self.pending.mark(url);
        }
        vec![
            Action::Dispatch(StoreIntent::UpdateFavorites(channel.clone())),
            Action::Notify {
                key: FAVORITES_UPDATED,
                duration: self.toast_duration,
            },
        ]
    }

    pub fn is_favorite(&self, channel: &Channel) -> bool {
        self.favorites.is_favorite(channel)
    }

    pub fn favorite_hint(&self, channel: &Channel) -> RenderHint {
        channel
            .url()
            .map_or(RenderHint::Normal, |url| self.pending.render_hint(url))
    }

    pub fn favorites(&self) -> &FavoritesCache {
        &self.favorites
    }

    // ── Store streams ────────────────────────────────────────────────────────

    /// Favorites stream emission: replaces membership entirely.
    pub fn on_favorites(&mut self, urls: Option<Vec<String>>) {
        if self.detached {
            return;
        }
        self.favorites.replace(urls);
        self.pending.on_confirmed();
    }

    /// Active-channel stream emission. Yields a `ScheduleScroll` for any
    /// channel with an id.
    pub fn on_active_channel(&mut self, channel: Option<&Channel>) -> Vec<Action> {
        if self.detached {
            return vec![];
        }
        match self.sync.observe(channel) {
            Some(id) => vec![Action::ScheduleScroll(id)],
            None => vec![],
        }
    }

    pub fn active_channel_id(&self) -> Option<&str> {
        self.sync.active_id()
    }

    // ── Keyboard ─────────────────────────────────────────────────────────────

    /// Document-level hotkeys. Ctrl+F focuses search instead of the host's find.
    pub fn handle_hotkey(&mut self, event: &mut KeyUiEvent) -> Vec<Action> {
        let key = &event.inner;
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let is_f = matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&'f'));
        if is_f && key.modifiers.contains(KeyModifiers::CONTROL) {
            event.prevent_default();
            return vec![Action::FocusSearch];
        }
        vec![]
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Called every UI tick. Returns `true` when a pending star timed out.
    pub fn tick(&mut self) -> bool {
        self.pending.tick()
    }

    /// Stop reacting to store streams. Later emissions are ignored.
    pub fn destroy(&mut self) {
        self.detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

/// Stable render key for a card: `id`, else `url`, else the row index.
pub fn track_by(index: usize, channel: &Channel) -> String {
    channel
        .identity()
        .map_or_else(|| index.to_string(), str::to_string)
}
