//! FocusRing — keyboard focus cycling between the search bar and the grid.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    /// No-op for ids that aren't in the ring.
    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Focus the Nth item in the ring (0-indexed). No-op if out of bounds.
    pub fn set_by_position(&mut self, pos: usize) -> Option<ComponentId> {
        if pos < self.items.len() {
            self.current = pos;
            self.current()
        } else {
            None
        }
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(vec![ComponentId::ChannelGrid, ComponentId::SearchBar])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_both_ways() {
        let mut ring = FocusRing::new(vec![ComponentId::SearchBar, ComponentId::ChannelGrid]);
        assert_eq!(ring.current(), Some(ComponentId::SearchBar));
        assert_eq!(ring.next(), Some(ComponentId::ChannelGrid));
        assert_eq!(ring.next(), Some(ComponentId::SearchBar));
        assert_eq!(ring.prev(), Some(ComponentId::ChannelGrid));
    }

    #[test]
    fn test_set_ignores_unknown_ids() {
        let mut ring = FocusRing::default();
        ring.set(ComponentId::HelpOverlay);
        assert!(ring.is_focused(ComponentId::ChannelGrid));
        ring.set(ComponentId::SearchBar);
        assert!(ring.is_focused(ComponentId::SearchBar));
        assert_eq!(ring.set_by_position(5), None);
    }
}
