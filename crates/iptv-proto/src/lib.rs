//! Shared types for the IPTV channel grid: the channel model, the application
//! store, configuration, platform paths and the route table.

pub mod channel;
pub mod config;
pub mod platform;
pub mod routes;
pub mod store;
