//! Input events with browser-style handling flags.
//!
//! Handlers mark an event instead of returning a bool so the caller can tell
//! "don't run the default for this key" apart from "don't let the enclosing
//! element see this click".

use ratatui::crossterm::event::{KeyEvent, MouseEvent};

#[derive(Debug, Clone)]
pub struct UiEvent<E> {
    pub inner: E,
    default_prevented: bool,
    propagation_stopped: bool,
}

pub type KeyUiEvent = UiEvent<KeyEvent>;
pub type MouseUiEvent = UiEvent<MouseEvent>;

impl<E> UiEvent<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Suppress whatever the host would do with this event by default.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Keep the event from reaching enclosing handlers.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl<E> From<E> for UiEvent<E> {
    fn from(inner: E) -> Self {
        Self::new(inner)
    }
}
