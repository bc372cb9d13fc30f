//! Favorites membership, mirrored from the store's favorites stream.

use std::collections::HashSet;

use iptv_proto::channel::Channel;

/// Set of favorite channel URLs. Rebuilt wholesale on every store emission.
#[derive(Debug, Default, Clone)]
pub struct FavoritesCache {
    urls: HashSet<String>,
}

impl FavoritesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the membership with `urls`. `None` empties the set.
    pub fn replace(&mut self, urls: Option<Vec<String>>) {
        self.urls = urls.unwrap_or_default().into_iter().collect();
    }

    pub fn is_favorite(&self, channel: &Channel) -> bool {
        channel.url().is_some_and(|url| self.urls.contains(url))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
