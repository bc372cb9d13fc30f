//! Status bar — bottom line with input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_PLAYING, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "GRID",
            Self::Search => "SEARCH",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " ←↑↓→/hjkl move  Enter/Space play  * favorite  / or Ctrl+F search  Tab focus  ? help  q quit"
            }
            Self::Search => " type to filter  Enter keep  Esc clear, again to leave  Tab focus",
        }
    }
}

/// Draw the keybindings footer bar (one row). `active` names the playing channel.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, active: Option<&str>) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
    )];
    if let Some(name) = active {
        spans.push(Span::styled("▶ ", Style::default().fg(C_PLAYING)));
        spans.push(Span::styled(name.to_string(), Style::default().fg(C_SECONDARY)));
    }
    spans.push(Span::styled(mode.keys(), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
