pub mod channel_grid;
pub mod help_overlay;
pub mod search_bar;
