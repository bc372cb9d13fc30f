//! Store — single-writer application state shared with the views.
//!
//! The store owns two subscribable cells, the favorites list and the active
//! channel. Views get read-only `watch::Receiver`s and talk back by sending
//! `StoreIntent`s; only the reducer loop in `Store::run` writes to the cells.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::channel::Channel;

/// Requests a view can make of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreIntent {
    /// Make this channel the active one.
    SetActiveChannel(Channel),
    /// Toggle this channel's URL in the favorites list.
    UpdateFavorites(Channel),
}

/// Cloneable read/dispatch handle given to views.
#[derive(Clone)]
pub struct StoreHandle {
    favorites: watch::Receiver<Vec<String>>,
    active: watch::Receiver<Option<Channel>>,
    intents: mpsc::Sender<StoreIntent>,
}

impl StoreHandle {
    pub fn favorites(&self) -> watch::Receiver<Vec<String>> {
        self.favorites.clone()
    }

    pub fn active_channel(&self) -> watch::Receiver<Option<Channel>> {
        self.active.clone()
    }

    /// Fire-and-forget dispatch. A full or closed channel drops the intent.
    pub fn dispatch(&self, intent: StoreIntent) {
        if let Err(e) = self.intents.try_send(intent) {
            debug!("store intent dropped: {}", e);
        }
    }
}

pub struct Store {
    favorites: watch::Sender<Vec<String>>,
    active: watch::Sender<Option<Channel>>,
}

impl Store {
    /// Create a store seeded with `favorites` plus the handle views use and
    /// the receiving end of the intent channel for `run`.
    pub fn new(favorites: Vec<String>) -> (Self, StoreHandle, mpsc::Receiver<StoreIntent>) {
        let (fav_tx, fav_rx) = watch::channel(favorites);
        let (active_tx, active_rx) = watch::channel(None);
        let (intent_tx, intent_rx) = mpsc::channel(256);
        let store = Self {
            favorites: fav_tx,
            active: active_tx,
        };
        let handle = StoreHandle {
            favorites: fav_rx,
            active: active_rx,
            intents: intent_tx,
        };
        (store, handle, intent_rx)
    }

    /// Apply one intent and publish the resulting state.
    pub fn apply(&self, intent: StoreIntent) {
        debug!("store: apply {:?}", intent);
        match intent {
            StoreIntent::SetActiveChannel(channel) => {
                self.active.send_replace(Some(channel));
            }
            StoreIntent::UpdateFavorites(channel) => {
                let Some(url) = channel.url.filter(|u| !u.is_empty()) else {
                    return;
                };
                self.favorites.send_modify(|favs| {
                    if let Some(pos) = favs.iter().position(|f| *f == url) {
                        favs.remove(pos);
                    } else {
                        favs.push(url);
                    }
                });
            }
        }
    }

    pub fn clear_active(&self) {
        self.active.send_replace(None);
    }

    pub fn favorites_snapshot(&self) -> Vec<String> {
        self.favorites.borrow().clone()
    }

    /// Reducer loop. Returns once every `StoreHandle` has been dropped.
    pub async fn run(self, mut intents: mpsc::Receiver<StoreIntent>) {
        info!("store: starting reducer loop");
        while let Some(intent) = intents.recv().await {
            self.apply(intent);
        }
        info!("store: intent channel closed, reducer loop exiting");
    }
}
