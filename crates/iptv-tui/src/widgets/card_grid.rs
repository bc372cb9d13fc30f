//! Card grid layout: where each card sits for a given area and scroll offset.
//!
//! Cards flow left to right, then top to bottom. Content coordinates start at
//! 0 at the top of the first row; screen coordinates add the area origin and
//! subtract the scroll offset.

use ratatui::layout::Rect;

/// Rows per card: border, name line, detail line, border.
pub const CARD_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CardGridLayout {
    pub area: Rect,
    pub columns: usize,
    pub card_width: u16,
    pub card_height: u16,
    pub item_count: usize,
}

impl CardGridLayout {
    /// `min_card_width` is stretched so the columns fill `area` exactly.
    pub fn new(area: Rect, min_card_width: u16, item_count: usize) -> Self {
        let min_card_width = min_card_width.max(8);
        let columns = (area.width / min_card_width).max(1) as usize;
        let card_width = (area.width / columns as u16).max(1);
        Self {
            area,
            columns,
            card_width,
            card_height: CARD_HEIGHT,
            item_count,
        }
    }

    /// True once the layout has been computed for a real area.
    pub fn is_drawn(&self) -> bool {
        self.area.width > 0 && self.area.height > 0
    }

    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            return 0;
        }
        self.item_count.div_ceil(self.columns)
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.columns.max(1)
    }

    pub fn column_of(&self, index: usize) -> usize {
        index % self.columns.max(1)
    }

    pub fn content_height(&self) -> f32 {
        (self.rows() * self.card_height as usize) as f32
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.area.height as f32).max(0.0)
    }

    /// Top of card `index` in content coordinates.
    pub fn content_top(&self, index: usize) -> f32 {
        (self.row_of(index) * self.card_height as usize) as f32
    }

    /// Top of card `index` on screen at scroll offset `scroll`.
    pub fn screen_top(&self, index: usize, scroll: f32) -> f32 {
        self.area.y as f32 + self.content_top(index) - scroll
    }

    /// Visible slice of card `index` at scroll offset `scroll`, or `None` when
    /// no row of it is on screen. Cards cut by either edge are clipped.
    pub fn card_clip(&self, index: usize, scroll: u16) -> Option<CardClip> {
        if index >= self.item_count || !self.is_drawn() {
            return None;
        }
        let top = self.content_top(index) as i32 - scroll as i32;
        let bottom = top + self.card_height as i32;
        if bottom <= 0 || top >= self.area.height as i32 {
            return None;
        }
        let skip_top = (-top).max(0) as u16;
        let visible_top = top.max(0) as u16;
        let rect = Rect {
            x: self.area.x + self.column_of(index) as u16 * self.card_width,
            y: self.area.y + visible_top,
            width: self.card_width,
            height: self.card_height - skip_top,
        };
        Some(CardClip {
            visible: rect.intersection(self.area),
            skip_top,
        })
    }

    /// Screen rect of the visible part of card `index`.
    pub fn card_rect(&self, index: usize, scroll: u16) -> Option<Rect> {
        self.card_clip(index, scroll).map(|c| c.visible)
    }

    /// Range of card indices with at least one row visible at `scroll`.
    pub fn visible_range(&self, scroll: u16) -> std::ops::Range<usize> {
        let card_h = self.card_height.max(1) as usize;
        let first_row = scroll as usize / card_h;
        let last_row = (scroll as usize + self.area.height as usize).div_ceil(card_h);
        let start = (first_row * self.columns).min(self.item_count);
        let end = (last_row * self.columns).min(self.item_count);
        start..end
    }

    /// Card under screen position (`col`, `row`).
    pub fn hit(&self, col: u16, row: u16, scroll: u16) -> Option<usize> {
        self.visible_range(scroll)
            .find(|&i| self.card_rect(i, scroll).is_some_and(|r| contains(r, col, row)))
    }

    /// Smallest scroll that shows card `index` in full, starting from `scroll`.
    pub fn scroll_to_reveal(&self, index: usize, scroll: f32) -> f32 {
        let top = self.content_top(index);
        let bottom = top + self.card_height as f32;
        let view_h = self.area.height as f32;
        if top < scroll {
            top
        } else if bottom > scroll + view_h {
            (bottom - view_h).max(0.0)
        } else {
            scroll
        }
    }
}

/// On-screen part of a card. `skip_top` rows of the card are above the area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardClip {
    pub visible: Rect,
    pub skip_top: u16,
}

impl CardClip {
    /// Whether the whole card is on screen.
    pub fn is_whole(&self, card_height: u16) -> bool {
        self.skip_top == 0 && self.visible.height == card_height
    }

    /// Screen row of card row `offset`, if that row is visible.
    pub fn screen_row(&self, offset: u16) -> Option<u16> {
        let row = offset.checked_sub(self.skip_top)?;
        (row < self.visible.height).then(|| self.visible.y + row)
    }
}

/// The star glyph sits in the first three columns of a card's name line.
pub fn star_hit(card: CardClip, col: u16, row: u16) -> bool {
    let x = card.visible.x;
    card.screen_row(1) == Some(row) && col > x && col <= x + 3
}

fn contains(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}
