use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single playable channel as handed to the grid by its owner.
///
/// Every field is optional because playlists in the wild are sloppy: a channel
/// is addressed by `id` when it has one and by `url` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Stream URL. Also the key under which favorites are stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Playlist group title (e.g. "News", "Sports"). Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Logo URL. Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Non-empty `id`, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Stable identity: `id` if present, else `url`.
    pub fn identity(&self) -> Option<&str> {
        self.id().or_else(|| self.url())
    }

    /// Name used for display, falling back to the URL and then a placeholder.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.url.as_deref())
            .unwrap_or("unnamed channel")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelFileError {
    #[error("failed to read channel file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse channel file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize)]
struct TomlChannelFile {
    #[serde(default)]
    channel: Vec<Channel>,
}

/// Load a channel list from a TOML file made of `[[channel]]` tables.
pub fn load_channels_from_toml(path: &Path) -> Result<Vec<Channel>, ChannelFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ChannelFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_channels_from_toml_str(&content).map_err(|source| ChannelFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_channels_from_toml_str(content: &str) -> Result<Vec<Channel>, toml::de::Error> {
    let file: TomlChannelFile = toml::from_str(content)?;
    Ok(file.channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_prefers_id_then_url() {
        let both = Channel::new("ch1", "One", "http://one");
        assert_eq!(both.identity(), Some("ch1"));

        let url_only = Channel {
            url: Some("http://two".into()),
            ..Default::default()
        };
        assert_eq!(url_only.identity(), Some("http://two"));

        let empty_id = Channel {
            id: Some(String::new()),
            url: Some("http://three".into()),
            ..Default::default()
        };
        assert_eq!(empty_id.identity(), Some("http://three"));

        assert_eq!(Channel::default().identity(), None);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let blank = Channel {
            name: Some("   ".into()),
            url: Some("http://x".into()),
            ..Default::default()
        };
        assert_eq!(blank.display_name(), "http://x");
        assert_eq!(Channel::default().display_name(), "unnamed channel");
    }

    #[test]
    fn test_parse_channels_toml() {
        let src = r#"
            [[channel]]
            id = "1"
            name = "News 24"
            url = "http://news"
            group = "News"

            [[channel]]
            name = "No Id"
            url = "http://noid"
        "#;
        let channels = parse_channels_from_toml_str(src).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].id(), Some("1"));
        assert_eq!(channels[0].group.as_deref(), Some("News"));
        assert_eq!(channels[1].id(), None);
        assert_eq!(channels[1].identity(), Some("http://noid"));
    }

    #[test]
    fn test_parse_empty_file() {
        assert!(parse_channels_from_toml_str("").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load_channels_from_toml(&path).unwrap_err();
        assert!(matches!(err, ChannelFileError::Read { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }
}
