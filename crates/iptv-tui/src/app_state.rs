//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use iptv_proto::channel::Channel;

use crate::i18n::Translator;
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub translator: Translator,
    pub input_mode: InputMode,
    /// Last value of the store's active-channel stream.
    pub active_channel: Option<Channel>,
    /// Why the channel list couldn't be loaded, if it couldn't.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn new(translator: Translator) -> Self {
        Self {
            translator,
            input_mode: InputMode::Normal,
            active_channel: None,
            load_error: None,
        }
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.instant(key)
    }

    pub fn active_channel_name(&self) -> Option<&str> {
        self.active_channel.as_ref().map(Channel::display_name)
    }
}
