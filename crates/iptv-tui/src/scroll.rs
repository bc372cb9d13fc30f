//! Scroll-to-channel: locate a channel's card, center it in its scroll
//! container, and animate the container there.
//!
//! Geometry is vertical only and expressed in rendered rows as `f32`, so the
//! centering math can land between rows; the grid rounds when drawing.

/// Vertical extent of something on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

/// A scrollable ancestor of a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    /// Where the container sits on screen.
    pub bounds: Bounds,
    /// Current scroll offset.
    pub scroll_top: f32,
    /// Visible height of the scrolled content.
    pub client_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Anything that can find a channel's rendered card and scroll to it.
pub trait ScrollSurface {
    /// On-screen bounds of the card tagged with `channel_id`, if it is rendered.
    fn element_bounds(&self, channel_id: &str) -> Option<Bounds>;

    /// Nearest scrollable container around that card.
    fn scroll_container(&self, channel_id: &str) -> Option<Container>;

    fn scroll_container_to(&mut self, channel_id: &str, top: f32, behavior: ScrollBehavior);

    /// Fallback when there is no scrollable container: bring the card into
    /// view, centered.
    fn scroll_into_view(&mut self, channel_id: &str, behavior: ScrollBehavior);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    /// Container scrolled to this offset.
    Centered(f32),
    /// No container; fell back to scroll-into-view.
    IntoView,
    /// No card for this id (filtered out, or not rendered).
    NotFound,
}

/// Offset that puts the middle of `element` at the middle of `container`.
/// Never negative.
pub fn centered_offset(container: &Container, element: &Bounds) -> f32 {
    let element_offset_top = element.top - container.bounds.top + container.scroll_top;
    let target = element_offset_top - container.client_height / 2.0 + element.height / 2.0;
    target.max(0.0)
}

/// Center the card for `channel_id`. Missing cards are a silent no-op.
pub fn scroll_to_channel<S: ScrollSurface + ?Sized>(
    surface: &mut S,
    channel_id: &str,
) -> ScrollOutcome {
    if channel_id.is_empty() {
        return ScrollOutcome::NotFound;
    }
    let Some(element) = surface.element_bounds(channel_id) else {
        return ScrollOutcome::NotFound;
    };
    match surface.scroll_container(channel_id) {
        Some(container) => {
            let top = centered_offset(&container, &element);
            surface.scroll_container_to(channel_id, top, ScrollBehavior::Smooth);
            ScrollOutcome::Centered(top)
        }
        None => {
            surface.scroll_into_view(channel_id, ScrollBehavior::Smooth);
            ScrollOutcome::IntoView
        }
    }
}

/// Eased scroll position. `tick` moves a fraction of the remaining distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothScroll {
    position: f32,
    target: f32,
}

const EASE: f32 = 0.5;
const SNAP: f32 = 0.25;

impl SmoothScroll {
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whole-row offset to draw with.
    pub fn row(&self) -> u16 {
        self.position.max(0.0).round() as u16
    }

    pub fn is_settled(&self) -> bool {
        self.position == self.target
    }

    pub fn scroll_to(&mut self, target: f32, behavior: ScrollBehavior) {
        self.target = target.max(0.0);
        if behavior == ScrollBehavior::Instant {
            self.position = self.target;
        }
    }

    /// Keep both position and target within `[0, max]`.
    pub fn clamp(&mut self, max: f32) {
        let max = max.max(0.0);
        self.target = self.target.clamp(0.0, max);
        self.position = self.position.clamp(0.0, max);
    }

    /// Advance one animation frame. Returns `true` if the position moved.
    pub fn tick(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        let delta = self.target - self.position;
        if delta.abs() <= SNAP {
            self.position = self.target;
        } else {
            self.position += delta * EASE;
        }
        true
    }
}
