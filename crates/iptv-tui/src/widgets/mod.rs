pub mod card_grid;
pub mod pane_chrome;
pub mod search_input;
pub mod status_bar;
pub mod toast;
