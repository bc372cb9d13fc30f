use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub epg: EpgConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay between an active-channel change and the scroll that centers it,
    /// giving the grid one layout pass to settle.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// How long the "favorites updated" toast stays up.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
    /// Width of a channel card in terminal columns.
    #[serde(default = "default_card_width")]
    pub card_width: u16,
}

/// Where the channel list comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Local TOML file made of `[[channel]]` tables.
    /// Defaults to `$XDG_CONFIG_HOME/iptv-grid/channels.toml`.
    #[serde(default = "default_channels_toml")]
    pub channels_toml: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EpgConfig {
    /// Program guide endpoint; queried as `{base_url}?channel=<name>`.
    /// Lookups are only logged when unset.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            card_width: default_card_width(),
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            channels_toml: default_channels_toml(),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

fn default_settle_delay_ms() -> u64 {
    100
}

fn default_toast_duration_ms() -> u64 {
    2000
}

fn default_card_width() -> u16 {
    28
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_channels_toml() -> PathBuf {
    platform::config_dir().join("channels.toml")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, writing the defaults there first if it doesn't exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ui.settle_delay_ms, 100);
        assert_eq!(config.ui.toast_duration_ms, 2000);
        assert_eq!(config.i18n.locale, "en");
        assert!(config.epg.base_url.is_none());
        assert!(config
            .channels
            .channels_toml
            .ends_with("iptv-grid/channels.toml"));
    }

    #[test]
    fn test_load_creates_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let first = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(first.ui.card_width, 28);

        std::fs::write(
            &path,
            "[ui]\nsettle_delay_ms = 250\n\n[epg]\nbase_url = \"http://epg.local/programs\"\n",
        )
        .unwrap();
        let second = Config::load_from(&path).unwrap();
        assert_eq!(second.ui.settle_delay_ms, 250);
        assert_eq!(second.ui.toast_duration_ms, 2000);
        assert_eq!(
            second.epg.base_url.as_deref(),
            Some("http://epg.local/programs")
        );
    }
}
