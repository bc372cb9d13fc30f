//! One-line search box above the grid.

use ratatui::crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::C_SECONDARY,
    ui_event::{KeyUiEvent, MouseUiEvent},
    widgets::search_input::{SearchAction, SearchInput},
};

/// Width of the clear button drawn at the right edge while there's text.
const CLEAR_BUTTON_W: u16 = 3;

pub struct SearchBar {
    input: SearchInput,
    area: Rect,
}

impl SearchBar {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: SearchInput::new(placeholder),
            area: Rect::default(),
        }
    }

    pub fn text(&self) -> &str {
        self.input.text()
    }

    fn clear_button(&self) -> Option<Rect> {
        if self.input.is_empty() || self.area.width <= CLEAR_BUTTON_W {
            return None;
        }
        Some(Rect {
            x: self.area.x + self.area.width - CLEAR_BUTTON_W,
            width: CLEAR_BUTTON_W,
            height: 1,
            ..self.area
        })
    }
}

impl Component for SearchBar {
    fn id(&self) -> ComponentId {
        ComponentId::SearchBar
    }

    fn handle_key(&mut self, event: &mut KeyUiEvent, _state: &AppState) -> Vec<Action> {
        match self.input.handle_key(event.inner) {
            SearchAction::Changed(term) => vec![Action::SearchChanged(term)],
            SearchAction::Cleared => vec![Action::ClearSearch],
            SearchAction::Blurred | SearchAction::Confirmed => vec![Action::FocusGrid],
            SearchAction::None => vec![],
        }
    }

    fn handle_mouse(&mut self, event: &mut MouseUiEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        let mouse = event.inner;
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        let on_clear = self.clear_button().is_some_and(|r| {
            mouse.column >= r.x && mouse.column < r.x + r.width && mouse.row == r.y
        });
        if on_clear {
            event.stop_propagation();
            return vec![Action::ClearSearch];
        }
        vec![Action::FocusSearch]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if *action == Action::ClearSearch {
            self.input.clear();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        self.area = area;
        let input_area = match self.clear_button() {
            Some(button) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        " ✕ ",
                        Style::default().fg(C_SECONDARY).add_modifier(Modifier::BOLD),
                    )),
                    button,
                );
                Rect {
                    width: area.width - CLEAR_BUTTON_W,
                    ..area
                }
            }
            None => area,
        };
        self.input.draw(frame, input_area, focused);
    }
}
