//! Translator. Resolves dotted message keys (`CHANNELS.FAVORITES_UPDATED`)
//! against nested JSON bundles.
//!
//! English and German ship with the binary. A `<locale>.json` in the user's
//! i18n directory is layered on top, key by key. Unknown keys resolve to
//! themselves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

const EN: &str = include_str!("../assets/i18n/en.json");
const DE: &str = include_str!("../assets/i18n/de.json");

#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("failed to read translations {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid translations {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Translator {
    strings: HashMap<String, String>,
}

impl Translator {
    /// Bundled translations for `locale`, falling back to English.
    pub fn embedded(locale: &str) -> Self {
        let mut t = Self::default();
        // English underneath so a partial bundle still resolves every key
        t.merge_str(EN);
        if locale.eq_ignore_ascii_case("de") {
            t.merge_str(DE);
        }
        t
    }

    /// Bundled translations plus `<dir>/<locale>.json` if it exists.
    pub fn load(locale: &str, dir: &Path) -> Result<Self, I18nError> {
        let mut t = Self::embedded(locale);
        let path = dir.join(format!("{locale}.json"));
        if !path.exists() {
            return Ok(t);
        }
        let content = std::fs::read_to_string(&path).map_err(|source| I18nError::Read {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| I18nError::Parse { path, source })?;
        flatten("", &value, &mut t.strings);
        Ok(t)
    }

    fn merge_str(&mut self, json: &str) {
        match parse_bundle(json) {
            Ok(strings) => self.strings.extend(strings),
            Err(e) => warn!("bundled translations are invalid: {}", e),
        }
    }

    /// Translate `key` synchronously. Missing keys come back verbatim.
    pub fn instant(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn parse_bundle(json: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let mut strings = HashMap::new();
    flatten("", &value, &mut strings);
    Ok(strings)
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        _ => {}
    }
}
