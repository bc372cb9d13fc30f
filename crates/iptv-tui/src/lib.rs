//! Channel grid view-state engine and its terminal front end.

pub mod action;
pub mod app;
pub mod app_state;
pub mod component;
pub mod components;
pub mod epg;
pub mod favorites;
pub mod filter;
pub mod focus;
pub mod grid;
pub mod i18n;
pub mod intent;
pub mod scroll;
pub mod subscription;
pub mod sync;
pub mod theme;
pub mod ui_event;
pub mod widgets;
