//! Toast notifications — transient, auto-dismissing status messages.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        self.push_at(message, severity, duration, Instant::now());
    }

    pub fn push_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
        now: Instant,
    ) {
        // Same message again restarts its timer instead of stacking
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            duration,
            expires: now + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Drop expired toasts. Returns `true` if any were removed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires > now);
        self.toasts.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Render toasts in the top-right corner of `area`, newest first.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            if y >= area.y + area.height {
                break;
            }
            let msg_len = toast.message.chars().count() as u16;
            let w = (msg_len + 4).min(max_width);
            let x = area.x + area.width.saturating_sub(w + 1);

            let (color, icon) = match toast.severity {
                Severity::Info => (C_TOAST_INFO, "·"),
                Severity::Error => (C_TOAST_ERROR, "✗"),
            };

            let toast_area = Rect {
                x,
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            frame.render_widget(
                Paragraph::new(Line::from(vec![Span::styled(
                    format!(" {} {} ", icon, &toast.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )])),
                toast_area,
            );
            y += 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_its_duration() {
        let t0 = Instant::now();
        let mut toasts = ToastManager::new();
        toasts.push_at("Favorites updated", Severity::Info, Duration::from_millis(2000), t0);

        assert!(!toasts.tick_at(t0 + Duration::from_millis(1999)));
        assert_eq!(toasts.toasts().count(), 1);
        assert!(toasts.tick_at(t0 + Duration::from_millis(2000)));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_duplicate_message_restarts_instead_of_stacking() {
        let t0 = Instant::now();
        let mut toasts = ToastManager::new();
        toasts.push_at("same", Severity::Info, Duration::from_millis(2000), t0);
        toasts.push_at(
            "same",
            Severity::Info,
            Duration::from_millis(2000),
            t0 + Duration::from_millis(1500),
        );
        assert_eq!(toasts.toasts().count(), 1);
        assert!(!toasts.tick_at(t0 + Duration::from_millis(2500)));
    }

    #[test]
    fn test_queue_is_capped() {
        let mut toasts = ToastManager::new();
        for i in 0..20 {
            toasts.push(format!("msg {i}"), Severity::Info, Duration::from_secs(60));
        }
        assert_eq!(toasts.toasts().count(), 8);
        assert_eq!(toasts.toasts().last().map(|t| t.message.as_str()), Some("msg 19"));
    }
}
