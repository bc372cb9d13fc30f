//! The main pane: one card per channel.
//!
//! Wraps `GridView` (the view state) with everything that needs a terminal:
//! card layout, the keyboard cursor, smooth scrolling and hit-testing.

use std::time::Duration;

use iptv_proto::channel::Channel;
use ratatui::crossterm::event::{KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    grid::{track_by, GridView},
    intent::RenderHint,
    scroll::{scroll_to_channel, Bounds, Container, ScrollBehavior, ScrollOutcome, ScrollSurface, SmoothScroll},
    theme::{
        C_BADGE_ERR, C_BADGE_PENDING, C_GROUP, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY,
        C_SELECTION_BG, C_STARS,
    },
    ui_event::{KeyUiEvent, MouseUiEvent},
    widgets::{
        card_grid::{star_hit, CardClip, CardGridLayout, CARD_HEIGHT},
        pane_chrome::{card_chrome, pane_chrome, Badge},
    },
};

pub struct ChannelGrid {
    view: GridView,
    layout: CardGridLayout,
    scroll: SmoothScroll,
    cursor: usize,
    /// `track_by` key of the card under the cursor, so it survives refiltering.
    cursor_key: Option<String>,
    /// Card to center once the grid has been laid out.
    pending_center: Option<String>,
    min_card_width: u16,
}

impl ChannelGrid {
    pub fn new(toast_duration: Duration, min_card_width: u16) -> Self {
        Self {
            view: GridView::new(toast_duration),
            layout: CardGridLayout::default(),
            scroll: SmoothScroll::default(),
            cursor: 0,
            cursor_key: None,
            pending_center: None,
            min_card_width,
        }
    }

    pub fn view(&self) -> &GridView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut GridView {
        &mut self.view
    }

    pub fn set_channels(&mut self, channels: Option<Vec<Channel>>) {
        self.view.set_channel_list(channels);
        self.restore_cursor();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_channel(&self) -> Option<&Channel> {
        self.view.filtered().get(self.cursor)
    }

    pub fn layout(&self) -> &CardGridLayout {
        &self.layout
    }

    /// Where the grid is scrolling to (the animation may still be under way).
    pub fn scroll_target(&self) -> f32 {
        self.scroll.target()
    }

    pub fn has_pending_center(&self) -> bool {
        self.pending_center.is_some()
    }

    /// Center the card for `channel_id` in the grid.
    pub fn center_on(&mut self, channel_id: &str) -> ScrollOutcome {
        let outcome = scroll_to_channel(self, channel_id);
        debug!("grid: center on {} -> {:?}", channel_id, outcome);
        outcome
    }

    /// Lay the cards out in `area`. Any center request that arrived before
    /// the grid had an area is applied here.
    pub fn resize(&mut self, area: Rect) {
        self.layout = CardGridLayout::new(area, self.min_card_width, self.view.filtered().len());
        self.scroll.clamp(self.layout.max_scroll());
        if let Some(id) = self.pending_center.take() {
            self.center_on(&id);
        }
    }

    fn refresh_layout(&mut self) {
        let area = self.layout.area;
        self.layout = CardGridLayout::new(area, self.min_card_width, self.view.filtered().len());
        if self.layout.is_drawn() {
            self.scroll.clamp(self.layout.max_scroll());
        }
    }

    // ── Cursor ───────────────────────────────────────────────────────────────

    fn move_cursor_by(&mut self, delta: isize) {
        let len = self.view.filtered().len();
        if len == 0 {
            return;
        }
        let next = (self.cursor as isize + delta).clamp(0, len as isize - 1) as usize;
        self.move_cursor_to(next);
    }

    fn move_cursor_to(&mut self, index: usize) {
        let len = self.view.filtered().len();
        if len == 0 {
            return;
        }
        self.cursor = index.min(len - 1);
        self.cursor_key = self
            .view
            .filtered()
            .get(self.cursor)
            .map(|c| track_by(self.cursor, c));
        if self.layout.is_drawn() {
            let target = self.layout.scroll_to_reveal(self.cursor, self.scroll.target());
            self.scroll.scroll_to(target, ScrollBehavior::Smooth);
        }
    }

    /// Put the cursor back on the same card after the list changed, or on the
    /// first card if that one is gone.
    fn restore_cursor(&mut self) {
        let filtered = self.view.filtered();
        let found = self.cursor_key.as_ref().and_then(|key| {
            filtered
                .iter()
                .enumerate()
                .position(|(i, c)| &track_by(i, c) == key)
        });
        self.cursor = found.unwrap_or(0);
        self.cursor_key = filtered.get(self.cursor).map(|c| track_by(self.cursor, c));
        self.refresh_layout();
    }

    fn page_size(&self) -> isize {
        let rows = (self.layout.area.height / CARD_HEIGHT).max(1) as usize;
        (self.layout.columns.max(1) * rows) as isize
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Draw card `index`. A card cut by the pane edge is rendered whole off
    /// screen and only its visible rows are copied in.
    fn draw_clipped_card(&self, buf: &mut Buffer, clip: CardClip, channel: &Channel, is_cursor: bool, focused: bool) {
        if clip.is_whole(self.layout.card_height) {
            self.draw_card(buf, clip.visible, channel, is_cursor, focused);
            return;
        }
        let full = Rect {
            x: clip.visible.x,
            y: 0,
            width: clip.visible.width,
            height: self.layout.card_height,
        };
        let mut scratch = Buffer::empty(full);
        self.draw_card(&mut scratch, full, channel, is_cursor, focused);
        for dy in 0..clip.visible.height {
            for dx in 0..clip.visible.width {
                let src = scratch[(full.x + dx, clip.skip_top + dy)].clone();
                buf[(clip.visible.x + dx, clip.visible.y + dy)] = src;
            }
        }
    }

    fn draw_card(&self, buf: &mut Buffer, rect: Rect, channel: &Channel, is_cursor: bool, focused: bool) {
        let active = channel.id().is_some() && channel.id() == self.view.active_channel_id();
        let block = card_chrome(is_cursor, focused, active);
        let inner = block.inner(rect);
        block.render(rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let fav = self.view.is_favorite(channel);
        let glyph = if fav { "★" } else { "☆" };
        let (star, star_color) = match self.view.favorite_hint(channel) {
            RenderHint::Normal => (glyph, if fav { C_STARS } else { C_MUTED }),
            RenderHint::PendingVisible => (glyph, C_BADGE_PENDING),
            RenderHint::PendingHidden => (" ", C_MUTED),
            RenderHint::TimedOut => ("?", C_BADGE_ERR),
        };

        let name_style = if active {
            Style::default().fg(C_PLAYING).add_modifier(Modifier::BOLD)
        } else if is_cursor {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let text_width = inner.width.saturating_sub(3) as usize;

        let name_line = Line::from(vec![
            Span::styled(format!(" {star} "), Style::default().fg(star_color)),
            Span::styled(truncate(channel.display_name(), text_width), name_style),
        ]);

        let mut detail = vec![Span::raw("   ")];
        if active {
            detail.push(Span::styled("▶ ", Style::default().fg(C_PLAYING)));
        }
        if let Some(group) = channel.group.as_deref().filter(|g| !g.is_empty()) {
            detail.push(Span::styled(
                truncate(group, text_width.saturating_sub(2)),
                Style::default().fg(C_GROUP),
            ));
        }

        let bg = if is_cursor {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        Paragraph::new(vec![name_line, Line::from(detail)])
            .style(bg)
            .render(inner, buf);
    }
}

/// The grid is its own scroll container; card geometry comes from the last layout.
impl ScrollSurface for ChannelGrid {
    fn element_bounds(&self, channel_id: &str) -> Option<Bounds> {
        let index = self
            .view
            .filtered()
            .iter()
            .position(|c| c.id() == Some(channel_id))?;
        Some(Bounds {
            top: self.layout.screen_top(index, self.scroll.position()),
            height: self.layout.card_height as f32,
        })
    }

    fn scroll_container(&self, _channel_id: &str) -> Option<Container> {
        if !self.layout.is_drawn() {
            return None;
        }
        let area = self.layout.area;
        Some(Container {
            bounds: Bounds {
                top: area.y as f32,
                height: area.height as f32,
            },
            scroll_top: self.scroll.position(),
            client_height: area.height as f32,
        })
    }

    fn scroll_container_to(&mut self, _channel_id: &str, top: f32, behavior: ScrollBehavior) {
        self.scroll
            .scroll_to(top.min(self.layout.max_scroll()), behavior);
    }

    fn scroll_into_view(&mut self, channel_id: &str, _behavior: ScrollBehavior) {
        self.pending_center = Some(channel_id.to_string());
    }
}

impl Component for ChannelGrid {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelGrid
    }

    fn handle_key(&mut self, event: &mut KeyUiEvent, _state: &AppState) -> Vec<Action> {
        if event.inner.kind == KeyEventKind::Release {
            return vec![];
        }

        // The focused card sees the key first
        let card = self.cursor_channel().cloned();
        let actions = self.view.on_card_key_down(event, card.as_ref());
        if event.is_default_prevented() {
            return actions;
        }

        let key = event.inner;
        let cols = self.layout.columns.max(1) as isize;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor_by(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor_by(-cols),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor_by(cols),
            KeyCode::PageUp => self.move_cursor_by(-self.page_size()),
            KeyCode::PageDown => self.move_cursor_by(self.page_size()),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor_to(0),
            KeyCode::End | KeyCode::Char('G') => {
                self.move_cursor_to(self.view.filtered().len().saturating_sub(1))
            }
            KeyCode::Char('*') | KeyCode::Char('f')
                if !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                if let Some(card) = card {
                    return self.view.toggle_favorite(&card, event);
                }
            }
            KeyCode::Char('/') => return vec![Action::FocusSearch],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: &mut MouseUiEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        let mouse = event.inner;
        let step = CARD_HEIGHT as f32;
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                let target = (self.scroll.target() - step).max(0.0);
                self.scroll.scroll_to(target, ScrollBehavior::Smooth);
            }
            MouseEventKind::ScrollDown => {
                let target = (self.scroll.target() + step).min(self.layout.max_scroll());
                self.scroll.scroll_to(target, ScrollBehavior::Smooth);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let scroll = self.scroll.row();
                let Some(index) = self.layout.hit(mouse.column, mouse.row, scroll) else {
                    return vec![];
                };
                let Some(channel) = self.view.filtered().get(index).cloned() else {
                    return vec![];
                };

                let mut actions = Vec::new();
                let on_star = self
                    .layout
                    .card_clip(index, scroll)
                    .is_some_and(|clip| star_hit(clip, mouse.column, mouse.row));
                if on_star {
                    actions.extend(self.view.toggle_favorite(&channel, event));
                }
                // Star clicks stop here; the card underneath never sees them
                if event.is_propagation_stopped() {
                    return actions;
                }
                self.move_cursor_to(index);
                actions.extend(self.view.select_channel(Some(&channel)));
                return actions;
            }
            _ => {}
        }
        vec![]
    }

    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        self.view.tick();
        self.scroll.tick();
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SearchChanged(term) => {
                self.view.on_search_change(term.clone());
                self.restore_cursor();
                vec![]
            }
            Action::ClearSearch => {
                let out = self.view.clear_search();
                self.restore_cursor();
                out
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let total = self.view.channel_list().len();
        let shown = self.view.filtered().len();
        let badge_text = if self.view.search_term().trim().is_empty() {
            total.to_string()
        } else {
            format!("{shown}/{total}")
        };
        let title = state.t("CHANNELS.TITLE");
        let block = pane_chrome(
            &title,
            Some('2'),
            focused,
            Some(Badge {
                text: &badge_text,
                color: C_SECONDARY,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.resize(inner);

        if shown == 0 {
            let msg = if total > 0 {
                state.t("CHANNELS.NO_MATCHES")
            } else {
                state
                    .load_error
                    .clone()
                    .unwrap_or_else(|| state.t("CHANNELS.NO_CHANNELS"))
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {msg}"), Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let scroll = self.scroll.row();
        for index in self.layout.visible_range(scroll) {
            let (Some(clip), Some(channel)) =
                (self.layout.card_clip(index, scroll), self.view.filtered().get(index))
            else {
                continue;
            };
            self.draw_clipped_card(frame.buffer_mut(), clip, channel, index == self.cursor, focused);
        }
    }
}

/// Cut `text` to `width` columns, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
