//! The channel search box, on top of tui-input.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    Changed(String),
    /// Esc with text present: the text was emptied.
    Cleared,
    /// Esc on an empty box: give focus back.
    Blurred,
    Confirmed,
    None,
}

pub struct SearchInput {
    input: Input,
    placeholder: String,
}

impl SearchInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
        }
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchAction {
        if key.kind == KeyEventKind::Release {
            return SearchAction::None;
        }
        match key.code {
            KeyCode::Esc if self.is_empty() => SearchAction::Blurred,
            KeyCode::Esc => {
                self.clear();
                SearchAction::Cleared
            }
            KeyCode::Enter => SearchAction::Confirmed,
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() == before {
                    SearchAction::None
                } else {
                    SearchAction::Changed(self.input.value().to_string())
                }
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let width = area.width.saturating_sub(4) as usize;
        let scroll = self.input.visual_scroll(width);
        let value = self.input.value();
        let prompt_color = if focused { C_FILTER_FG } else { C_SECONDARY };

        let text = if value.is_empty() {
            Span::styled(self.placeholder.as_str(), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(visible, Style::default().fg(C_FILTER_FG))
        };
        let line = Line::from(vec![
            Span::styled("/ ", Style::default().fg(prompt_color)),
            text,
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(C_FILTER_BG)),
            area,
        );

        if focused && area.width > 2 {
            let cursor_x = area.x + 2 + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}
